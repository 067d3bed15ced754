//! Console output: the progress bar and the end-of-session summary.

use mdl_core::category::Category;
use mdl_core::scheduler::ProgressStats;
use mdl_core::session::SessionReport;

pub const BAR_WIDTH: usize = 30;

/// `Progress: |███░░░| 3/10 (30.0%)`
pub fn render_progress_line(stats: &ProgressStats, width: usize) -> String {
    let filled = ((stats.fraction() * width as f64).round() as usize).min(width);
    format!(
        "Progress: |{}{}| {}/{} ({:.1}%)",
        "█".repeat(filled),
        "░".repeat(width - filled),
        stats.completed,
        stats.total,
        stats.percent()
    )
}

pub fn render_summary(report: &SessionReport) -> String {
    let s = &report.summary;
    let mut out = String::new();
    if s.total_candidates == 0 {
        out.push_str("No media files found\n");
    } else {
        out.push_str(&format!("Saved: {}\n", s.saved));
        out.push_str(&format!("Errors: {}\n", s.errors));
        if let Some(rate) = s.success_rate() {
            out.push_str(&format!("Success rate: {:.1}%\n", rate));
        }
        for category in Category::MEDIA {
            let n = s.saved_by_category.get(&category).copied().unwrap_or(0);
            if let Some(dir) = category.dir_name() {
                out.push_str(&format!("  {}: {}\n", dir, n));
            }
        }
    }
    out.push_str(&format!("Output: {}\n", report.output_dir.display()));
    out.push_str(&format!("Manifest: {}\n", report.manifest_path.display()));
    out
}

pub fn print_summary(report: &SessionReport) {
    print!("{}", render_summary(report));
}
