use std::path::PathBuf;
use std::str::FromStr;

use foodlenz_core::domain::{
    food_analysis::entities::Profile,
    session::entities::{NutritionUnit, Tab},
};

pub const HELP: &str = "\
Commands:
  search <food>              analyze a dish or product by name
  upload <path>              analyze a photo (jpg, png, webp, heic)
  tab <home|history|favorites|profile>
  open <n>                   open the n-th item of the current list
  cancel                     stop waiting for the current request
  back                       return to the main screen
  fav                        add or remove the open analysis from favorites
  qty <n> <quantity>         edit the quantity of ingredient n
  update                     recalculate with the edited quantities
  unit <serving|100g|custom> [grams]
  chat <message>             ask a question about the open analysis
  share [n]                  print a shareable summary, or of recipe n
  profile <name>             general, diabetic, athlete, liver-care, weight-loss, vegan
  allergies <text>           set allergies (recalculates an open analysis)
  goals <text>               set custom goals (recalculates an open analysis)
  help
  quit";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Search(String),
    Upload(PathBuf),
    Tab(Tab),
    Open(usize),
    Favorite,
    Back,
    Cancel,
    Profile(Profile),
    Allergies(String),
    Goals(String),
    Quantity { index: usize, quantity: String },
    Update,
    Unit {
        unit: NutritionUnit,
        grams: Option<String>,
    },
    Chat(String),
    /// Whole analysis, or the recipe at this position.
    Share(Option<usize>),
    Help,
    Quit,
    Empty,
}

impl Command {
    pub fn is_cancel(line: &str) -> bool {
        matches!(line.parse::<Command>(), Ok(Command::Cancel) | Ok(Command::Back))
    }
}

/// Positions are typed 1-based and stored 0-based.
fn parse_position(text: &str) -> Result<usize, String> {
    match text.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(format!("'{}' is not a list position", text)),
    }
}

fn required<'a>(rest: &'a str, usage: &str) -> Result<&'a str, String> {
    if rest.is_empty() {
        return Err(format!("Usage: {}", usage));
    }
    Ok(rest)
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word.to_lowercase().as_str() {
            "" => Ok(Command::Empty),
            "search" | "s" => Ok(Command::Search(rest.to_string())),
            "upload" | "u" => Ok(Command::Upload(PathBuf::from(required(
                rest,
                "upload <path>",
            )?))),
            "tab" => Ok(Command::Tab(required(rest, "tab <name>")?.parse()?)),
            "home" | "history" | "favorites" => Ok(Command::Tab(word.parse()?)),
            "open" | "o" => Ok(Command::Open(parse_position(required(rest, "open <n>")?)?)),
            "fav" | "favorite" => Ok(Command::Favorite),
            "back" | "b" => Ok(Command::Back),
            "cancel" => Ok(Command::Cancel),
            "profile" if rest.is_empty() => Ok(Command::Tab(Tab::Profile)),
            "profile" => Ok(Command::Profile(rest.parse()?)),
            "allergies" => Ok(Command::Allergies(rest.to_string())),
            "goals" => Ok(Command::Goals(rest.to_string())),
            "qty" => {
                let usage = "qty <n> <quantity>";
                let (position, quantity) = required(rest, usage)?
                    .split_once(char::is_whitespace)
                    .ok_or_else(|| format!("Usage: {}", usage))?;
                Ok(Command::Quantity {
                    index: parse_position(position)?,
                    quantity: quantity.trim().to_string(),
                })
            }
            "update" => Ok(Command::Update),
            "unit" => {
                let mut parts = required(rest, "unit <serving|100g|custom> [grams]")?
                    .split_whitespace();
                let unit = parts.next().unwrap_or_default().parse()?;
                let grams = parts.next().map(str::to_string);
                Ok(Command::Unit { unit, grams })
            }
            "chat" | "ask" => Ok(Command::Chat(rest.to_string())),
            "share" if rest.is_empty() => Ok(Command::Share(None)),
            "share" => Ok(Command::Share(Some(parse_position(rest)?))),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            other => Err(format!("Unknown command '{}'. Type 'help'.", other)),
        }
    }
}
