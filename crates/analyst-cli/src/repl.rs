//! Interactive loop driving one evaluation session

use crate::commands::Command;
use crate::render::{self, OutputMode, Presentable};
use analyst_core::{DatasetSchema, EvalTarget, EvaluationSession, ScoringService};
use std::io::{BufRead, Write};
use std::sync::Arc;
use tracing::debug;

/// What a command produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    /// Nothing to print; a failure shows up as the pending notice
    Silent,
    Exit,
}

pub struct Repl<S: ScoringService> {
    session: EvaluationSession<S>,
    output: OutputMode,
}

impl<S> Repl<S>
where
    S: ScoringService,
    S::Evaluation: Presentable,
{
    pub fn new(service: Arc<S>, output: OutputMode) -> Self {
        Self {
            session: EvaluationSession::new(service),
            output,
        }
    }

    pub fn session(&self) -> &EvaluationSession<S> {
        &self.session
    }

    fn schema(&self) -> DatasetSchema {
        self.session.service().schema()
    }

    pub fn tool_name(&self) -> &'static str {
        match self.schema() {
            DatasetSchema::Stock => "Stock Evaluator",
            DatasetSchema::Portfolio => "Portfolio Analyzer",
        }
    }

    pub fn prompt(&self) -> String {
        let tool = match self.schema() {
            DatasetSchema::Stock => "stock",
            DatasetSchema::Portfolio => "portfolio",
        };
        format!("{tool} [{}]> ", render::stage_name(self.session.stage()))
    }

    /// Run one command against the session
    pub async fn execute(&self, command: Command) -> anyhow::Result<Reply> {
        let reply = match command {
            Command::Upload(path) => match self.session.ingest(path.as_deref()).await {
                Ok(dataset) => Reply::Text(format!(
                    "Uploaded {} ({} records)\n{}",
                    dataset.file_name(),
                    dataset.len(),
                    self.listing()?
                )),
                Err(_) => Reply::Silent,
            },
            Command::List => Reply::Text(self.listing()?),
            Command::Eval(id) => match self.resolve(&id) {
                Some(id) => self.evaluate(EvalTarget::Entity(id)).await?,
                None => Reply::Text(format!("'{id}' is not listed. Use `list` to see entities.")),
            },
            Command::EvalAll => self.evaluate_all().await?,
            Command::EvalDataset => self.evaluate(EvalTarget::Dataset).await?,
            Command::Close => {
                self.session.clear();
                Reply::Text(self.listing()?)
            }
            Command::Reset => {
                if self.session.reset() {
                    Reply::Text("Session reset. Upload a dataset to start over.".to_string())
                } else {
                    Reply::Text("A request is in flight; try again when it finishes.".to_string())
                }
            }
            Command::Status => Reply::Text(render::status(
                &self.session.snapshot(),
                self.session.is_busy(),
            )),
            Command::Help => Reply::Text(Command::help_text().trim().to_string()),
            Command::Exit => Reply::Exit,
        };
        Ok(reply)
    }

    /// Read commands until `exit` or end of input
    ///
    /// `first` runs before any input is read, e.g. an upload named on the
    /// command line.
    pub async fn run<R: BufRead, W: Write>(
        &self,
        first: Option<Command>,
        mut input: R,
        mut out: W,
    ) -> anyhow::Result<()> {
        writeln!(out, "{} ready. Type `help` for commands.", self.tool_name())?;

        if let Some(command) = first {
            if !self.step(command, &mut input, &mut out).await? {
                return Ok(());
            }
        }

        loop {
            write!(out, "{}", self.prompt())?;
            out.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                writeln!(out, "\nGoodbye!")?;
                break;
            }

            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let command = match Command::parse(line) {
                Ok(command) => command,
                Err(e) => {
                    writeln!(out, "Error: {e}")?;
                    continue;
                }
            };

            if !self.step(command, &mut input, &mut out).await? {
                break;
            }
        }

        Ok(())
    }

    /// Execute, print, then hold on a pending notice; `false` ends the loop
    async fn step<R: BufRead, W: Write>(
        &self,
        command: Command,
        input: &mut R,
        out: &mut W,
    ) -> anyhow::Result<bool> {
        debug!(?command, "Executing command");
        match self.execute(command).await? {
            Reply::Text(text) => writeln!(out, "{text}")?,
            Reply::Silent => {}
            Reply::Exit => {
                writeln!(out, "Goodbye!")?;
                return Ok(false);
            }
        }

        let Some(notice) = self.session.notice() else {
            return Ok(true);
        };
        writeln!(out, "{}", render::notice(&notice))?;
        out.flush()?;

        let mut line = String::new();
        let read = input.read_line(&mut line)?;
        self.session.dismiss_notice();
        Ok(read > 0)
    }

    fn listing(&self) -> serde_json::Result<String> {
        let entities = self.session.entities();
        match self.output {
            OutputMode::Table => Ok(render::entity_table(&entities, self.schema())),
            OutputMode::Json => serde_json::to_string_pretty(&entities),
        }
    }

    /// Listed id matching `id`, exactly or ignoring ASCII case
    fn resolve(&self, id: &str) -> Option<String> {
        let ids: Vec<String> = self.session.entities().into_iter().map(|e| e.id).collect();
        ids.iter()
            .find(|listed| listed.as_str() == id)
            .or_else(|| ids.iter().find(|listed| listed.eq_ignore_ascii_case(id)))
            .cloned()
    }

    async fn evaluate(&self, target: EvalTarget) -> anyhow::Result<Reply> {
        match self.session.evaluate(target).await {
            Ok(evaluation) => Ok(Reply::Text(evaluation.render(self.output)?)),
            Err(_) => Ok(Reply::Silent),
        }
    }

    /// Evaluate listed entities in order, stopping at the first failure
    async fn evaluate_all(&self) -> anyhow::Result<Reply> {
        let ids: Vec<String> = self.session.entities().into_iter().map(|e| e.id).collect();
        if ids.is_empty() {
            return Ok(Reply::Text(
                "No entities listed. Use `upload <path>` first.".to_string(),
            ));
        }

        let mut rendered = Vec::new();
        for id in ids {
            match self.session.evaluate(EvalTarget::Entity(id)).await {
                Ok(evaluation) => rendered.push(evaluation.render(self.output)?),
                Err(_) => break,
            }
        }

        if rendered.is_empty() {
            Ok(Reply::Silent)
        } else {
            Ok(Reply::Text(rendered.join("\n")))
        }
    }
}
