use anyhow::{anyhow, bail, Context};
use rust_decimal::Decimal;
use std::str::FromStr;
use teller_feed::OperationRequest;

pub const HELP: &str = "\
Accounts:
  open <account-id>                    load an account and its latest operations
  more                                 load the next page of operations
  ops                                  list loaded operations
  debit <amount> [description]
  credit <amount> [description]
  transfer <account-id> <amount> [description]
Chat:
  threads                              list chat threads
  new [message]                        start a thread
  select <thread-id>
  delete <thread-id>
  say <message>                        send on the active thread
  show                                 print the active thread
Other:
  help
  quit";

/// One line of REPL input
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Open(String),
    More,
    Operations,
    Submit(OperationRequest),
    Threads,
    NewThread(String),
    Select(String),
    Delete(String),
    Say(String),
    Show,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();

        let command = match verb.to_lowercase().as_str() {
            "open" => Command::Open(required(rest, "account id")?),
            "more" => Command::More,
            "ops" => Command::Operations,
            "debit" => {
                let (amount, description) = amount_and_description(rest)?;
                Command::Submit(OperationRequest::debit(amount).with_description(description))
            }
            "credit" => {
                let (amount, description) = amount_and_description(rest)?;
                Command::Submit(OperationRequest::credit(amount).with_description(description))
            }
            "transfer" => {
                let (destination, rest) = rest
                    .split_once(char::is_whitespace)
                    .ok_or_else(|| anyhow!("usage: transfer <account-id> <amount> [description]"))?;
                let (amount, description) = amount_and_description(rest.trim())?;
                Command::Submit(
                    OperationRequest::transfer(destination, amount).with_description(description),
                )
            }
            "threads" => Command::Threads,
            "new" => Command::NewThread(rest.to_string()),
            "select" => Command::Select(required(rest, "thread id")?),
            "delete" => Command::Delete(required(rest, "thread id")?),
            "say" => Command::Say(rest.to_string()),
            "show" => Command::Show,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            "" => bail!("empty command"),
            other => bail!("unknown command '{}', try 'help'", other),
        };
        Ok(command)
    }
}

fn required(value: &str, what: &str) -> anyhow::Result<String> {
    if value.is_empty() {
        bail!("missing {}", what);
    }
    Ok(value.to_string())
}

fn amount_and_description(rest: &str) -> anyhow::Result<(Decimal, &str)> {
    let (amount, description) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
    if amount.is_empty() {
        bail!("missing amount");
    }
    let amount = Decimal::from_str(amount).with_context(|| format!("invalid amount '{}'", amount))?;
    Ok((amount, description.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use teller_types::OperationType;

    #[test]
    fn test_parse_account_commands() {
        assert_eq!("open  A1 ".parse::<Command>().unwrap(), Command::Open("A1".into()));
        assert_eq!("MORE".parse::<Command>().unwrap(), Command::More);

        let Command::Submit(request) = "debit 12.50 monthly rent".parse::<Command>().unwrap() else {
            panic!("expected submit");
        };
        assert_eq!(request.op_type, OperationType::Debit);
        assert_eq!(request.amount, Decimal::new(1250, 2));
        assert_eq!(request.description.as_deref(), Some("monthly rent"));
    }

    #[test]
    fn test_parse_transfer() {
        let Command::Submit(request) = "transfer B2 40".parse::<Command>().unwrap() else {
            panic!("expected submit");
        };
        assert_eq!(request.op_type, OperationType::Transfer);
        assert_eq!(request.destination.as_deref(), Some("B2"));
        assert_eq!(request.amount, Decimal::from(40));
        assert_eq!(request.description, None);

        assert!("transfer B2".parse::<Command>().is_err());
    }

    #[test]
    fn test_parse_chat_commands() {
        assert_eq!("new".parse::<Command>().unwrap(), Command::NewThread(String::new()));
        assert_eq!(
            "say what is my balance?".parse::<Command>().unwrap(),
            Command::Say("what is my balance?".into())
        );
        assert_eq!("delete t_1".parse::<Command>().unwrap(), Command::Delete("t_1".into()));
    }

    #[test]
    fn test_parse_errors() {
        assert!("open".parse::<Command>().is_err());
        assert!("credit abc".parse::<Command>().is_err());
        assert!("launch".parse::<Command>().is_err());
        assert!("   ".parse::<Command>().is_err());
    }
}
