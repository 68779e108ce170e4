// Entry point and high-level CLI flow.
//
// - Option [1] loads the JSON export, printing diagnostics.
// - Option [2] renders the statistics tables for the whole site and each
//   managing-site group, exports them as CSV, and writes a JSON summary.
// - Option [3] drills into one statistic and lists the matching clients.
mod conditions;
mod loader;
mod output;
mod stats;
mod types;
mod util;

use chrono::Local;
use once_cell::sync::Lazy;
use std::io::{self, Write};
use std::sync::Mutex;
use types::{JobSeeker, StatRow};

// Simple in-memory app state so we only load the export once but can
// generate reports and drill-downs multiple times in a single run.
static APP_STATE: Lazy<Mutex<AppState>> = Lazy::new(|| Mutex::new(AppState { data: None }));

struct AppState {
    data: Option<Vec<JobSeeker>>,
}

/// Read a single line of input after printing the common "Enter choice:" prompt.
///
/// The prompt is reused for both the main menu and simple numeric inputs.
fn read_choice() -> String {
    print!("Enter choice: ");
    let _ = io::stdout().flush();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf.trim().to_string()
}

/// Ask the user whether to go back to the report selection menu after
/// generating reports.
///
/// Returns `true` if the user chose `Y`, `false` if they chose `N`.
fn prompt_back_to_menu() -> bool {
    loop {
        print!("Back to Report Selection (Y/N): ");
        let _ = io::stdout().flush();
        let mut buf = String::new();
        io::stdin().read_line(&mut buf).ok();
        let resp = buf.trim().to_uppercase();
        match resp.as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

fn loaded_data() -> Option<Vec<JobSeeker>> {
    let state = APP_STATE.lock().unwrap();
    state.data.clone()
}

/// Handle option [1]: load the JSON export.
///
/// On success, we store the `Vec<JobSeeker>` in `APP_STATE` and print a
/// short textual summary of what happened.
fn handle_load() {
    let path = "SUB216.json";
    match loader::load(path) {
        Ok((data, report)) => {
            println!(
                "Processing export... ({} records loaded, {} in the active caseload, {} managing sites)",
                util::format_int(report.total_rows as i64),
                util::format_int(report.caseload_rows as i64),
                util::format_int(report.managing_sites as i64)
            );
            if report.unparsed_we12_dates > 0 {
                println!(
                    "Note: {} records have a WE12 end date that could not be parsed; they will never count as expired.",
                    util::format_int(report.unparsed_we12_dates as i64)
                );
            }
            println!("");
            let mut state = APP_STATE.lock().unwrap();
            state.data = Some(data);
        }
        Err(e) => {
            eprintln!("Failed to load file: {}\n", e);
        }
    }
}

/// Handle option [2]: render and export the statistics tables.
///
/// This function is intentionally side-effectful:
/// - writes one CSV per group,
/// - writes a JSON summary,
/// - and prints a table per group to the console.
fn handle_generate_reports() {
    let Some(data) = loaded_data() else {
        println!("Error: No data loaded. Please load the export first (option 1).\n");
        return;
    };
    let today = Local::now().date_naive();

    println!("Generating statistics...\n");

    let mut groups: Vec<(&str, Vec<JobSeeker>)> = vec![("Site", data.clone())];
    for (name, code) in stats::SITE_GROUPS.iter().copied() {
        groups.push((name, stats::site_partition(&data, code)));
    }

    for (name, subset) in &groups {
        let assembled = stats::assemble(subset, today);
        let rows: Vec<StatRow> = assembled.iter().map(StatRow::from).collect();
        let file = format!("stats_{}.csv", name.to_lowercase());
        if let Err(e) = output::write_csv(&file, &rows) {
            eprintln!("Write error: {}", e);
        }
        println!("{} ({} records)\n", name, util::format_int(subset.len() as i64));
        output::preview_table(&rows, rows.len());
        println!("(Table exported to {})\n", file);
    }

    let summary = stats::summarize(&data);
    if let Err(e) = output::write_json("summary.json", &summary) {
        eprintln!("Write error: {}", e);
    }
    println!(
        "Summary Stats (summary.json): {} records, {} in the active caseload\n",
        util::format_int(summary.total_records as i64),
        util::format_int(summary.total_caseload as i64)
    );
}

/// Handle option [3]: list the clients behind one statistic.
///
/// The console equivalent of expanding a row in the statistics table: pick
/// a group, pick a statistic, and the matching clients are printed with
/// their id and name columns.
fn handle_drill_down() {
    let Some(data) = loaded_data() else {
        println!("Error: No data loaded. Please load the export first (option 1).\n");
        return;
    };

    println!("Select group:");
    println!("[1] Site");
    for (i, (name, _)) in stats::SITE_GROUPS.iter().enumerate() {
        println!("[{}] {}", i + 2, name);
    }
    let subset: Vec<JobSeeker> = match read_choice().parse::<usize>() {
        Ok(1) => data,
        Ok(n) if (2..2 + stats::SITE_GROUPS.len()).contains(&n) => {
            stats::site_partition(&data, stats::SITE_GROUPS[n - 2].1)
        }
        _ => {
            println!("Invalid choice.\n");
            return;
        }
    };

    println!("Select statistic:");
    let catalogue = stats::catalogue();
    for (i, def) in catalogue.iter().enumerate() {
        println!("[{}] {}", i + 1, def.label);
    }
    let index = match read_choice().parse::<usize>() {
        Ok(n) if (1..=catalogue.len()).contains(&n) => n - 1,
        _ => {
            println!("Invalid choice.\n");
            return;
        }
    };

    let label = catalogue[index].label;
    let today = Local::now().date_naive();
    let rows = stats::clients(&subset, label, today);
    println!(
        "\n{}: {} client(s)\n",
        label,
        util::format_int(rows.len() as i64)
    );
    output::preview_table(&rows, rows.len());
}

fn main() {
    loop {
        println!("Job Seeker Statistics");
        println!("[1] Load the file");
        println!("[2] Generate Reports");
        println!("[3] Drill into a statistic\n");
        match read_choice().as_str() {
            "1" => {
                handle_load();
            }
            "2" => {
                println!("");
                handle_generate_reports();
                if !prompt_back_to_menu() {
                    println!("Exiting the program.");
                    break;
                }
            }
            "3" => {
                println!("");
                handle_drill_down();
            }
            _ => {
                println!("Invalid choice. Please enter 1, 2 or 3.\n");
            }
        }
    }
}
