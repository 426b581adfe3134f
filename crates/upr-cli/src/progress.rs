//! Progress indicators for retrieval operations

use indicatif::{ProgressBar, ProgressStyle};

/// Create a progress bar counting fetched entries
pub fn create_entry_progress(total: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg}\n{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({eta})")
            .expect("Invalid progress bar template")
            .progress_chars("#>-"),
    );
    pb.set_message(message.to_string());
    pb
}

/// Create a spinner for indeterminate operations (search pagination,
/// ID-mapping polls)
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("Invalid spinner template"),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_entry_progress() {
        let pb = create_entry_progress(42, "Fetching entries");
        assert_eq!(pb.length(), Some(42));
    }

    #[test]
    fn test_create_spinner() {
        let pb = create_spinner("Searching...");
        assert!(!pb.is_finished());
        pb.finish();
    }
}
