use lazy_static::lazy_static;
use regex::Regex;

/// A parsed budget/deadline quote from the pricing model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quote {
    pub budget_usd: u32,
    pub deadline_days: u32,
}

/// Parse the fixed quote grammar "Budget: <int> USD, Deadline: <int> days".
/// Either field missing yields None; the caller falls back to
/// deterministic pricing instead of erroring.
pub fn parse_quote(text: &str) -> Option<Quote> {
    lazy_static! {
        static ref BUDGET_RE: Regex = Regex::new(r"Budget:\s*(\d+)").unwrap();
        static ref DEADLINE_RE: Regex = Regex::new(r"Deadline:\s*(\d+)").unwrap();
    }

    let budget_usd = BUDGET_RE.captures(text)?.get(1)?.as_str().parse().ok()?;
    let deadline_days = DEADLINE_RE.captures(text)?.get(1)?.as_str().parse().ok()?;
    Some(Quote {
        budget_usd,
        deadline_days,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_exact_grammar() {
        let quote = parse_quote("Budget: 600 USD, Deadline: 10 days").unwrap();
        assert_eq!(quote.budget_usd, 600);
        assert_eq!(quote.deadline_days, 10);
    }

    #[test]
    fn tolerates_surrounding_chatter() {
        let quote = parse_quote("Sure! Budget: 250 USD, Deadline: 7 days. Good luck!").unwrap();
        assert_eq!(quote.budget_usd, 250);
        assert_eq!(quote.deadline_days, 7);
    }

    #[test]
    fn missing_deadline_is_unparsed() {
        assert_eq!(parse_quote("Budget: 600 USD"), None);
    }

    #[test]
    fn missing_budget_is_unparsed() {
        assert_eq!(parse_quote("Deadline: 10 days"), None);
    }

    #[test]
    fn freeform_text_is_unparsed() {
        assert_eq!(parse_quote("I think this project is worth about six hundred dollars"), None);
    }
}
