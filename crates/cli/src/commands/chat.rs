use std::io::BufRead;

use spendlens_agent::{AdvisorRuntime, ConversationLog};
use spendlens_core::config::AppConfig;
use tracing::info;

use crate::commands::{ChatArgs, CommandResult};

/// Answers every question from `args`, or every non-blank line of `input` when none were
/// given, and returns the transcript.
pub fn run(config: &AppConfig, args: &ChatArgs, input: impl BufRead) -> CommandResult {
    let questions = if args.questions.is_empty() {
        match read_questions(input) {
            Ok(questions) => questions,
            Err(error) => {
                return CommandResult::failure(
                    "chat",
                    "input",
                    format!("could not read questions from stdin: {error}"),
                    2,
                );
            }
        }
    } else {
        args.questions.clone()
    };
    if questions.is_empty() {
        return CommandResult::failure("chat", "input", "no questions were provided", 2);
    }

    let report = match args.scope.evaluate(config) {
        Ok(report) => report,
        Err(error) => return CommandResult::from_analytics_error("chat", &error),
    };

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                "chat",
                "runtime_init",
                format!("failed to initialize async runtime: {error}"),
                7,
            );
        }
    };

    let advisor = AdvisorRuntime::from_config(config);
    let mut log = ConversationLog::new();
    runtime.block_on(async {
        for question in &questions {
            advisor.handle_question(&mut log, question, &report.supplier_metrics).await;
        }
    });

    info!(
        event_name = "cli.chat.completed",
        session_id = %log.session_id(),
        questions = questions.len(),
        delegate_available = advisor.delegate_available(),
        "chat session finished"
    );

    CommandResult { exit_code: 0, output: log.render_transcript() }
}

fn read_questions(input: impl BufRead) -> std::io::Result<Vec<String>> {
    let mut questions = Vec::new();
    for line in input.lines() {
        let line = line?;
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            questions.push(trimmed.to_string());
        }
    }
    Ok(questions)
}
