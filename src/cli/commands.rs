use std::io::Write;

use anyhow::Result;

use crate::{
    controller::{Controller, Filter, Intent, NewTask, Outcome},
    model::{Size, TaskId},
    storage::task_store::TaskStore,
    summary,
    utils::time::format_elapsed,
};

use super::{
    output::{write_page, write_task_rows},
    Commands,
};

/// Turns a command into intents for `controller` and writes what the user should see.
pub async fn process_command<S: TaskStore>(
    controller: &mut Controller<S>,
    command: Commands,
    out: &mut impl Write,
    color: bool,
) -> Result<()> {
    match command {
        Commands::Add {
            title,
            description,
            size,
            tags,
        } => {
            let intent = Intent::CreateTask(NewTask {
                title,
                description,
                size: Some(size.unwrap_or(Size::None)),
                tags,
            });
            if let Outcome::Created(id) = controller.handle(intent).await? {
                writeln!(out, "Created task {id}")?;
            }
        }
        Commands::Start { id } => {
            controller.handle(Intent::StartTask(TaskId(id))).await?;
            writeln!(out, "Started task {id}")?;
        }
        Commands::Stop { id } => {
            if let Outcome::Stopped { id, total } =
                controller.handle(Intent::StopTask(TaskId(id))).await?
            {
                writeln!(out, "Stopped task {id}, {} total", format_elapsed(total))?;
            }
        }
        Commands::Delete { id } => {
            controller.handle(Intent::DeleteTask(TaskId(id))).await?;
            writeln!(out, "Deleted task {id}")?;
        }
        Commands::List {} => {
            write_task_rows(out, &controller.task_rows(), color)?;
        }
        Commands::Summary { size, tag } => {
            let filter = match (size, tag) {
                (Some(size), _) => Filter::Size(size),
                (None, Some(tag)) => Filter::Tag(tag),
                (None, None) => Filter::All,
            };
            controller.handle(Intent::SelectFilter(filter)).await?;
            write_page(out, &controller.page()?, color)?;
        }
        Commands::Tags {} => {
            for tag in summary::available_tags(controller.tasks()) {
                writeln!(out, "{tag}")?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use tempfile::tempdir;

    use crate::{
        cli::Commands,
        controller::Controller,
        error::{NotFound, TaskError},
        storage::{object_store::FileObjectStore, task_store::RecordTaskStore},
        utils::clock::DefaultClock,
    };

    use super::process_command;

    async fn run(
        controller: &mut Controller<RecordTaskStore<FileObjectStore>>,
        command: Commands,
    ) -> Result<String> {
        let mut out = Vec::new();
        process_command(controller, command, &mut out, false).await?;
        Ok(String::from_utf8(out)?)
    }

    fn add(title: &str, tags: &[&str]) -> Commands {
        Commands::Add {
            title: title.into(),
            description: None,
            size: None,
            tags: tags.iter().map(|v| v.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn test_commands_flow() -> Result<()> {
        let dir = tempdir()?;
        let store = RecordTaskStore::new(FileObjectStore::new(dir.path().to_owned())?);
        let mut controller = Controller::load(store, Box::new(DefaultClock)).await?;

        assert_eq!(run(&mut controller, add("First", &["b", "a"])).await?, "Created task 1\n");
        assert_eq!(run(&mut controller, add("Second", &["a"])).await?, "Created task 2\n");
        assert_eq!(
            controller.tasks()[0].size(),
            Some(crate::model::Size::None)
        );

        assert_eq!(
            run(&mut controller, Commands::Start { id: 1 }).await?,
            "Started task 1\n"
        );
        let listed = run(&mut controller, Commands::List {}).await?;
        assert!(listed.lines().next().unwrap().contains("First *"));

        let stopped = run(&mut controller, Commands::Stop { id: 1 }).await?;
        assert!(stopped.starts_with("Stopped task 1, 00:00:0"));

        assert_eq!(run(&mut controller, Commands::Tags {}).await?, "a\nb\n");

        let summary = run(
            &mut controller,
            Commands::Summary {
                size: None,
                tag: Some("b".into()),
            },
        )
        .await?;
        assert!(summary.contains("Tag b (a, b)"));
        assert!(summary.contains("First"));
        assert!(!summary.contains("Second"));

        assert_eq!(
            run(&mut controller, Commands::Delete { id: 2 }).await?,
            "Deleted task 2\n"
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_commands_report_errors() -> Result<()> {
        let dir = tempdir()?;
        let store = RecordTaskStore::new(FileObjectStore::new(dir.path().to_owned())?);
        let mut controller = Controller::load(store, Box::new(DefaultClock)).await?;

        let error = run(&mut controller, Commands::Stop { id: 3 })
            .await
            .unwrap_err();
        assert!(matches!(
            error.downcast_ref::<TaskError>(),
            Some(TaskError::NotFound(NotFound::Task(_)))
        ));

        run(&mut controller, add("Only", &[])).await?;
        let error = run(&mut controller, Commands::Stop { id: 1 })
            .await
            .unwrap_err();
        assert_eq!(error.to_string(), "task 1: task is not running");
        Ok(())
    }
}
