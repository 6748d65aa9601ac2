use anyhow::Result;

/// Everything in tasktimer runs on the calling thread, storage included.
pub fn single_thread_runtime() -> Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?)
}
