//! CLI driver for the record editor core.
//!
//! # Responsibility
//! - Ingest JSON files as one ordered selection and print a table page.
//! - With no files, print a linkage probe (`ping`/`version`).

use clap::Parser;
use clientrec_core::{
    default_log_level, init_logging, ManagerConfig, RecordManager, RecordView, DEFAULT_PAGE_SIZE,
};
use log::info;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(author, version, about = "Merge client record JSON files and print one page", long_about = None)]
struct Cli {
    /// JSON files, ingested in order
    files: Vec<PathBuf>,
    /// Case-insensitive filter on id, name and email
    #[arg(long)]
    search: Option<String>,
    /// 1-based page to print
    #[arg(long, default_value_t = 1)]
    page: usize,
    #[arg(long = "page-size", default_value_t = DEFAULT_PAGE_SIZE)]
    page_size: usize,
    /// Print the merged record set as JSON instead of a table
    #[arg(long)]
    export: bool,
    #[arg(long = "log-level")]
    log_level: Option<String>,
    /// Absolute directory for rolling log files; logging is off without it
    #[arg(long = "log-dir")]
    log_dir: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(dir) = cli.log_dir.as_ref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        if let Err(err) = init_logging(level, &dir.to_string_lossy()) {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    }

    if cli.files.is_empty() {
        println!("clientrec_core ping={}", clientrec_core::ping());
        println!("clientrec_core version={}", clientrec_core::core_version());
        return ExitCode::SUCCESS;
    }

    match run(&cli) {
        Ok(output) => {
            print!("{output}");
            ExitCode::SUCCESS
        }
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<String, String> {
    let mut manager = RecordManager::with_config(ManagerConfig::with_page_size(cli.page_size));
    for path in &cli.files {
        let outcome = manager.ingest_path(path).map_err(|err| err.to_string())?;
        info!(
            "event=cli_ingest module=cli status=ok added={} parsed={}",
            outcome.added, outcome.parsed
        );
    }

    if cli.export {
        let mut json = manager.export_json().map_err(|err| err.to_string())?;
        json.push('\n');
        return Ok(json);
    }

    if let Some(query) = cli.search.as_deref() {
        manager.search(query);
    }
    if cli.page != 1 {
        manager.go_to_page(cli.page).map_err(|err| err.to_string())?;
    }
    Ok(render_table(&manager.view()))
}

fn render_table(view: &RecordView) -> String {
    let cells = view
        .rows
        .iter()
        .map(|row| {
            let record = &row.record;
            [
                record.id.as_ref().map(ToString::to_string).unwrap_or_default(),
                record.name.clone().unwrap_or_default(),
                record.email.clone().unwrap_or_default(),
            ]
        })
        .collect::<Vec<_>>();

    let header = ["ID", "Name", "Email"];
    let mut widths = header.map(str::len);
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, &header.map(str::to_string), &widths);
    for row in &cells {
        push_line(&mut out, row, &widths);
    }
    out.push_str(&format!(
        "page {}/{} ({} of {} records)\n",
        view.current_page, view.page_count, view.filtered_count, view.total_count
    ));
    out
}

fn push_line(out: &mut String, cells: &[String; 3], widths: &[usize; 3]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(line.trim_end());
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::{render_table, run, Cli};
    use clap::Parser;
    use clientrec_core::{RecordManager, SelectedFile};
    use serde_json::json;

    #[test]
    fn render_table_aligns_columns_and_prints_footer() {
        let mut manager = RecordManager::new();
        manager
            .ingest_file(&SelectedFile::json(
                "a.json",
                json!([
                    { "id": 1, "name": "Ada", "email": "ada@x.io" },
                    { "id": 22, "name": "Bob", "email": "bob@x.io" }
                ])
                .to_string(),
            ))
            .expect("valid upload");

        let table = render_table(&manager.view());
        let lines = table.lines().collect::<Vec<_>>();
        assert_eq!(lines[0], "ID  Name  Email");
        assert_eq!(lines[1], "1   Ada   ada@x.io");
        assert_eq!(lines[2], "22  Bob   bob@x.io");
        assert_eq!(lines[3], "page 1/1 (2 of 2 records)");
    }

    #[test]
    fn run_reports_unreadable_file() {
        let cli = Cli::parse_from(["clientrec_cli", "/definitely/missing/clients.json"]);
        let err = run(&cli).expect_err("missing file should fail");
        assert!(err.contains("Could not read file"));
    }
}
