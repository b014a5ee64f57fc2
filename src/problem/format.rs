use owo_colors::OwoColorize;
use serde::Serialize;
use tinytemplate::TinyTemplate;

use super::messages::generate_error_message;
use crate::generating::Notice;
use crate::session::InsertError;

pub const MODULE_NAME: &str = "Insert Nums";

static MODAL: &str = r#"
[{module}] {problem}

{details}
"#;

#[derive(Serialize)]
struct Context {
    module: String,
    problem: String,
    details: String,
}

/// A one line message suitable for an editor's status bar.
pub fn status_notice(message: &str) -> String {
    format!("[{}] {}", MODULE_NAME, message)
}

/// Status lines for everything a run wants the user to know about.
pub fn notices(notices: &[Notice]) -> Vec<String> {
    notices
        .iter()
        .map(|notice| status_notice(&notice.message()))
        .collect()
}

/// Format an error with concise single-line output, the way a quiet
/// (previewing) session reports it.
pub fn concise_error(error: &InsertError) -> String {
    let (problem, _) = generate_error_message(error);
    status_notice(&problem)
}

/// Format an error in full, as a blocking dialog would show it, naming the
/// offending expression and what it raised.
pub fn full_error(error: &InsertError, styled: bool) -> String {
    let (problem, details) = generate_error_message(error);

    let context = if styled {
        Context {
            module: MODULE_NAME
                .bright_red()
                .to_string(),
            problem: problem
                .bold()
                .to_string(),
            details,
        }
    } else {
        Context {
            module: MODULE_NAME.to_string(),
            problem,
            details,
        }
    };

    let mut tt = TinyTemplate::new();
    tt.set_default_formatter(&tinytemplate::format_unescaped);

    let rendered = tt
        .add_template("modal", MODAL)
        .and_then(|_| tt.render("modal", &context));

    match rendered {
        Ok(text) => text
            .trim_ascii()
            .to_string(),
        Err(_) => format!(
            "[{}] {}\n\n{}",
            context.module, context.problem, context.details
        ),
    }
}
