use std::path::Path;

use crate::cli::report_error;
use crate::error::ReachaiError;
use crate::importer;
use crate::output;

pub fn run(file: &Path, json_output: bool) -> i32 {
    match run_inner(file, json_output) {
        Ok(code) => code,
        Err(e) => report_error(&e, json_output),
    }
}

fn run_inner(file: &Path, json_output: bool) -> Result<i32, ReachaiError> {
    let report = importer::inspect_file(file)?;
    if !report.is_valid() {
        let err = ReachaiError::missing_fields(&report.missing);
        if json_output {
            let mut v = output::json::error(&err);
            v["data"] = output::json::report_json(&report);
            println!("{v:#}");
        } else {
            output::text::print_report(&report);
        }
        return Ok(1);
    }

    if json_output {
        println!("{:#}", output::json::success(output::json::report_json(&report)));
    } else {
        output::text::print_report(&report);
        println!("Imported: {}", file.display());
    }
    Ok(0)
}

pub fn run_template(json_output: bool) -> i32 {
    let template = importer::template();
    if json_output {
        println!(
            "{:#}",
            output::json::success(serde_json::json!({ "template": template }))
        );
    } else {
        print!("{template}");
    }
    0
}
