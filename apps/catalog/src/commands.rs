//! Line commands typed at the prompt.

use catalog_view::ViewAction;
use shared::domain::{ItemId, SortBy, SortDir};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    View(ViewAction),
    Refetch,
    Show,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  q <text>            search titles (empty clears)
  category <name|all> filter by category
  sort <title|price|rating>
  dir <asc|desc>
  next | prev | page <n>
  select <id> | close
  reset               clear search, filters, sort and selection
  refetch             reload the current page
  show | help | quit";

pub fn parse_command(line: &str) -> Result<CliCommand, String> {
    let line = line.trim();
    let (name, arg) = match line.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (line, ""),
    };

    let command = match name.to_ascii_lowercase().as_str() {
        "" | "show" => CliCommand::Show,
        "help" | "?" => CliCommand::Help,
        "quit" | "exit" => CliCommand::Quit,
        "refetch" | "reload" => CliCommand::Refetch,
        "q" | "search" => CliCommand::View(ViewAction::SetQuery(arg.to_string())),
        "category" | "cat" => CliCommand::View(ViewAction::SetCategory(arg.to_string())),
        "sort" => {
            let sort_by = SortBy::parse(&arg.to_ascii_lowercase())
                .ok_or_else(|| format!("unknown sort field '{arg}' (title, price, rating)"))?;
            CliCommand::View(ViewAction::SetSortBy(sort_by))
        }
        "dir" => {
            let sort_dir = SortDir::parse(&arg.to_ascii_lowercase())
                .ok_or_else(|| format!("unknown direction '{arg}' (asc, desc)"))?;
            CliCommand::View(ViewAction::SetSortDir(sort_dir))
        }
        "next" => CliCommand::View(ViewAction::NextPage),
        "prev" => CliCommand::View(ViewAction::PrevPage),
        "page" => {
            let page = arg
                .parse::<u32>()
                .ok()
                .filter(|page| *page >= 1)
                .ok_or_else(|| format!("page must be a positive number, got '{arg}'"))?;
            CliCommand::View(ViewAction::GoToPage(page))
        }
        "select" => {
            let id = arg
                .parse::<i64>()
                .map_err(|_| format!("item id must be a number, got '{arg}'"))?;
            CliCommand::View(ViewAction::Select(Some(ItemId(id))))
        }
        "close" => CliCommand::View(ViewAction::Select(None)),
        "reset" => CliCommand::View(ViewAction::Reset),
        other => return Err(format!("unknown command '{other}', try 'help'")),
    };
    Ok(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_view_actions() {
        assert_eq!(
            parse_command("q  red shoes "),
            Ok(CliCommand::View(ViewAction::SetQuery("red shoes".into())))
        );
        assert_eq!(
            parse_command("q"),
            Ok(CliCommand::View(ViewAction::SetQuery(String::new())))
        );
        assert_eq!(
            parse_command("sort Price"),
            Ok(CliCommand::View(ViewAction::SetSortBy(SortBy::Price)))
        );
        assert_eq!(
            parse_command("page 3"),
            Ok(CliCommand::View(ViewAction::GoToPage(3)))
        );
        assert_eq!(
            parse_command("select 17"),
            Ok(CliCommand::View(ViewAction::Select(Some(ItemId(17)))))
        );
        assert_eq!(parse_command("close"), Ok(CliCommand::View(ViewAction::Select(None))));
        assert_eq!(parse_command(""), Ok(CliCommand::Show));
        assert_eq!(parse_command("QUIT"), Ok(CliCommand::Quit));
    }

    #[test]
    fn rejects_bad_arguments() {
        assert!(parse_command("sort size").is_err());
        assert!(parse_command("dir up").is_err());
        assert!(parse_command("page 0").is_err());
        assert!(parse_command("select abc").is_err());
        assert!(parse_command("teleport").is_err());
    }
}
