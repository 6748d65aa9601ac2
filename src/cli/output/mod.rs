//! Plain text rendering of controller pages.

use std::io::{self, Write};

use ansi_term::Colour;

use crate::controller::{GroupRow, Page, StatsView, TaskRow};

pub fn write_task_rows(out: &mut impl Write, rows: &[TaskRow], color: bool) -> io::Result<()> {
    if rows.is_empty() {
        return writeln!(out, "No tasks yet");
    }
    for row in rows {
        match &row.live_elapsed {
            Some(live) => {
                let marker = if color {
                    Colour::Green.bold().paint("*").to_string()
                } else {
                    "*".to_string()
                };
                writeln!(out, "{}\t{}\t{} {marker}", row.id, live, row.title)?;
            }
            None => writeln!(out, "{}\t{}\t{}", row.id, row.elapsed, row.title)?,
        }
    }
    Ok(())
}

pub fn write_page(out: &mut impl Write, page: &Page, color: bool) -> io::Result<()> {
    match page {
        Page::Overview {
            tasks,
            sizes,
            tags,
            stats,
        } => {
            write_title(out, "Everything", color)?;
            write_tasks_section(out, tasks, color)?;
            write_groups(out, "Sizes", sizes, color)?;
            write_groups(out, "Tags", tags, color)?;
            write_stats(out, stats, color)
        }
        Page::Size { size, tasks, stats } => {
            write_title(out, &format!("Size {size}"), color)?;
            write_tasks_section(out, tasks, color)?;
            write_stats(out, stats, color)
        }
        Page::Tag {
            options,
            tag,
            tasks,
            sizes,
            stats,
        } => {
            write_title(out, &format!("Tag {tag} ({})", options.join(", ")), color)?;
            write_tasks_section(out, tasks, color)?;
            write_groups(out, "Sizes", sizes, color)?;
            write_stats(out, stats, color)
        }
    }
}

fn write_title(out: &mut impl Write, title: &str, color: bool) -> io::Result<()> {
    if color {
        writeln!(out, "{}", Colour::White.bold().paint(title))
    } else {
        writeln!(out, "{title}")
    }
}

fn write_section(out: &mut impl Write, title: &str, color: bool) -> io::Result<()> {
    writeln!(out)?;
    if color {
        writeln!(out, "{}", Colour::Blue.bold().paint(title))
    } else {
        writeln!(out, "{title}")
    }
}

fn write_tasks_section(out: &mut impl Write, tasks: &[TaskRow], color: bool) -> io::Result<()> {
    write_section(out, "Tasks", color)?;
    if tasks.is_empty() {
        return writeln!(out, " - none");
    }
    for row in tasks {
        writeln!(out, " - {} total for {}", row.elapsed, row.title)?;
    }
    Ok(())
}

fn write_groups(
    out: &mut impl Write,
    title: &str,
    groups: &[GroupRow],
    color: bool,
) -> io::Result<()> {
    write_section(out, title, color)?;
    if groups.is_empty() {
        return writeln!(out, " - none");
    }
    for group in groups {
        let plural = if group.task_count == 1 { "" } else { "s" };
        writeln!(
            out,
            " - {} total for {} ({} task{plural})",
            group.elapsed, group.label, group.task_count
        )?;
    }
    Ok(())
}

fn write_stats(out: &mut impl Write, stats: &StatsView, color: bool) -> io::Result<()> {
    write_section(out, "Statistics", color)?;
    match stats {
        StatsView::Values { min, max, average } => {
            writeln!(out, " - {min} minimum")?;
            writeln!(out, " - {max} maximum")?;
            writeln!(out, " - {average} average")
        }
        StatsView::Empty => writeln!(out, " - no tasks to compute statistics for"),
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        controller::{GroupRow, Page, StatsView, TaskRow},
        model::{Size, TaskId},
    };

    use super::{write_page, write_task_rows};

    fn row(id: u32, title: &str, live: Option<&str>) -> TaskRow {
        TaskRow {
            id: TaskId(id),
            title: title.into(),
            elapsed: "01:00:00".into(),
            live_elapsed: live.map(String::from),
        }
    }

    #[test]
    fn test_write_task_rows() {
        let mut out = Vec::new();
        write_task_rows(
            &mut out,
            &[row(1, "A", None), row(2, "B", Some("02:30:00"))],
            false,
        )
        .unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "1\t01:00:00\tA\n2\t02:30:00\tB *\n"
        );
    }

    #[test]
    fn test_write_size_page_empty() {
        let mut out = Vec::new();
        let page = Page::Size {
            size: Size::XL,
            tasks: vec![],
            stats: StatsView::Empty,
        };
        write_page(&mut out, &page, false).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Size XL\n\nTasks\n - none\n\nStatistics\n - no tasks to compute statistics for\n"
        );
    }

    #[test]
    fn test_write_overview() {
        let mut out = Vec::new();
        let page = Page::Overview {
            tasks: vec![row(1, "A", None)],
            sizes: vec![GroupRow {
                label: "M".into(),
                elapsed: "05:00:00".into(),
                task_count: 2,
            }],
            tags: vec![],
            stats: StatsView::Values {
                min: "01:00:00".into(),
                max: "03:00:00".into(),
                average: "02:00:00".into(),
            },
        };
        write_page(&mut out, &page, false).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains(" - 05:00:00 total for M (2 tasks)\n"));
        assert!(out.contains("Tags\n - none\n"));
        assert!(out.ends_with(" - 02:00:00 average\n"));
    }
}
