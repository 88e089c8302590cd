use std::fmt::Write as _;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use teller_chat::{ChatSession, ChatTurn};
use teller_feed::{AccountDesk, LoadOutcome, SkipReason};
use teller_persist::{ChatRole, ChatThread};
use teller_types::{AccountSummary, AccountType, Operation};

use crate::command::{Command, HELP};

const PROMPT: &str = "teller> ";

/// Line-oriented front-end over one account desk and one chat session
pub struct Repl {
    desk: AccountDesk,
    chat: ChatSession,
}

impl Repl {
    pub fn new(desk: AccountDesk, chat: ChatSession) -> Self {
        Self { desk, chat }
    }

    /// Read commands until `quit` or end of input
    ///
    /// Bad commands and failed operations are printed and the loop goes on.
    pub async fn run<R, W>(&mut self, input: R, mut output: W) -> anyhow::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = input.lines();
        loop {
            output.write_all(PROMPT.as_bytes()).await?;
            output.flush().await?;

            let Some(line) = lines.next_line().await? else {
                break;
            };
            if line.trim().is_empty() {
                continue;
            }

            let reply = match line.parse::<Command>() {
                Ok(Command::Quit) => break,
                Ok(command) => self.execute(command).await,
                Err(e) => format!("error: {:#}", e),
            };
            output.write_all(reply.as_bytes()).await?;
            output.write_all(b"\n").await?;
        }
        output.flush().await?;
        Ok(())
    }

    pub async fn execute(&mut self, command: Command) -> String {
        match command {
            Command::Open(account_id) => match self.desk.open(&account_id).await {
                Ok(outcome) => {
                    let mut out = self
                        .desk
                        .summary()
                        .map(render_summary)
                        .unwrap_or_else(|| "account summary unavailable".to_string());
                    out.push('\n');
                    out.push_str(&self.render_outcome(outcome));
                    out
                }
                Err(e) => format!("error: {}", e),
            },
            Command::More => match self.desk.load_more().await {
                Ok(outcome) => self.render_outcome(outcome),
                Err(e) => format!("error: {}", e),
            },
            Command::Operations => {
                let operations = self.desk.operations();
                if operations.is_empty() {
                    return "no operations loaded".to_string();
                }
                operations.iter().map(render_operation).collect::<Vec<_>>().join("\n")
            }
            Command::Submit(request) => match self.desk.submit(request).await {
                Ok(outcome) => format!("done. {}", self.render_outcome(outcome)),
                Err(e) => format!("error: {}", e),
            },
            Command::Threads => {
                let active = self.chat.active().map(|t| t.id.clone());
                if self.chat.threads().is_empty() {
                    return "no threads".to_string();
                }
                self.chat
                    .threads()
                    .iter()
                    .map(|t| render_thread_line(t, active.as_deref() == Some(t.id.as_str())))
                    .collect::<Vec<_>>()
                    .join("\n")
            }
            Command::NewThread(input) => {
                let turn = self.chat.new_thread(&input).await;
                render_turn(&turn)
            }
            Command::Select(id) => match self.chat.select(&id) {
                Ok(thread) => render_thread(thread),
                Err(e) => format!("error: {}", e),
            },
            Command::Delete(id) => match self.chat.delete_thread(&id) {
                Ok(()) => format!("deleted {}", id),
                Err(e) => format!("error: {}", e),
            },
            Command::Say(input) => match self.chat.send(&input).await {
                Some(turn) => render_turn(&turn),
                None => "nothing to send".to_string(),
            },
            Command::Show => self
                .chat
                .active()
                .map(render_thread)
                .unwrap_or_else(|| "no active thread".to_string()),
            Command::Help => HELP.to_string(),
            Command::Quit => String::new(),
        }
    }

    fn render_outcome(&self, outcome: LoadOutcome) -> String {
        let state = self.desk.state();
        match outcome {
            LoadOutcome::Loaded { appended } => format!(
                "{} operations loaded ({} total{})",
                appended,
                state.items.len(),
                if state.has_more { ", more available" } else { "" }
            ),
            LoadOutcome::Skipped(SkipReason::InFlight) => "a page is already loading".to_string(),
            LoadOutcome::Skipped(SkipReason::Exhausted) => "no more operations".to_string(),
            LoadOutcome::Skipped(SkipReason::NotLoaded) => "open an account first".to_string(),
            LoadOutcome::Superseded => "result discarded, the feed was reloaded".to_string(),
        }
    }
}

pub fn render_summary(summary: &AccountSummary) -> String {
    let balance = summary
        .balance
        .map(|b| format!("{:.2}", b))
        .unwrap_or_else(|| "-".to_string());
    format!(
        "{} [{}] balance {}{}",
        summary.id,
        AccountType::label(summary.account_type.as_ref()),
        balance,
        summary
            .customer_name
            .as_deref()
            .map(|name| format!(" owner {}", name))
            .unwrap_or_default()
    )
}

pub fn render_operation(op: &Operation) -> String {
    format!(
        "{:>8}  {}  {:<8} {:>12.2}  {}",
        op.id,
        op.date.format("%Y-%m-%d %H:%M"),
        op.op_type.as_str(),
        op.amount,
        op.description.as_deref().unwrap_or("")
    )
}

fn render_thread_line(thread: &ChatThread, active: bool) -> String {
    format!(
        "{} {}  {} ({} messages)",
        if active { "*" } else { " " },
        thread.id,
        thread.title,
        thread.messages.len()
    )
}

fn render_thread(thread: &ChatThread) -> String {
    let mut out = format!("# {} ({})", thread.title, thread.id);
    for message in &thread.messages {
        let who = match message.role {
            ChatRole::User => "you",
            ChatRole::Assistant => "assistant",
        };
        let _ = write!(out, "\n{}: {}", who, message.content);
    }
    out
}

fn render_turn(turn: &ChatTurn) -> String {
    let mut out = match &turn.reply {
        Some(reply) => format!("assistant: {}", reply.content),
        None => format!("thread {} started", turn.thread_id),
    };
    if let Some(e) = &turn.persist_error {
        let _ = write!(out, "\nwarning: history not saved: {}", e);
    }
    out
}
