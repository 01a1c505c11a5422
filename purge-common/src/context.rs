//! Invocation context handed to the job by its scheduler.

use std::fmt;

use crate::config::DEFAULT_CUTOFF_DAYS;
use crate::error::ParameterError;

pub const CUTOFF_PARAM_NAME: &str = "CutoffDays";

/// Named values attached to a command item, stored as `a=b&c=d`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NameValueList {
    pairs: Vec<(String, String)>,
}

impl NameValueList {
    pub fn parse(raw: &str) -> Self {
        let pairs = url::form_urlencoded::parse(raw.trim().as_bytes())
            .filter(|(name, _)| !name.is_empty())
            .map(|(name, value)| (name.into_owned(), value.into_owned()))
            .collect();

        Self { pairs }
    }

    /// Looks a name up ignoring ASCII case. Repeated names yield their values joined by `,`.
    pub fn get(&self, name: &str) -> Option<String> {
        let values: Vec<&str> = self
            .pairs
            .iter()
            .filter(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
            .collect();

        if values.is_empty() {
            None
        } else {
            Some(values.join(","))
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for NameValueList
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            pairs: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }
}

/// The scheduled command being run, with its configured parameters.
#[derive(Clone, Debug, Default)]
pub struct CommandItem {
    pub name: String,
    pub parameters: NameValueList,
}

impl CommandItem {
    pub fn new(name: impl Into<String>, parameters: NameValueList) -> Self {
        Self {
            name: name.into(),
            parameters,
        }
    }
}

/// The schedule that fired the command. Only used to tag log entries.
#[derive(Clone, Debug, Default)]
pub struct ScheduleItem {
    pub name: String,
}

impl ScheduleItem {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Retention window in days; records older than this are purged. Always positive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CutoffDays(u32);

impl CutoffDays {
    pub fn new(days: u32) -> Option<Self> {
        (days > 0).then_some(Self(days))
    }

    /// Reads `CutoffDays` from the command parameters, falling back to `default` when absent.
    pub fn resolve(
        parameters: &NameValueList,
        default: CutoffDays,
    ) -> Result<Self, ParameterError> {
        let Some(raw) = parameters.get(CUTOFF_PARAM_NAME) else {
            return Ok(default);
        };

        let value = raw
            .trim()
            .parse::<i32>()
            .map_err(|_| ParameterError::NotANumber {
                name: CUTOFF_PARAM_NAME,
                value: raw.clone(),
            })?;

        u32::try_from(value)
            .ok()
            .and_then(Self::new)
            .ok_or(ParameterError::NotPositive {
                name: CUTOFF_PARAM_NAME,
                value,
            })
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for CutoffDays {
    fn default() -> Self {
        Self(DEFAULT_CUTOFF_DAYS)
    }
}

impl fmt::Display for CutoffDays {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_name_value_list() {
        let list = NameValueList::parse("CutoffDays=90&Label=purge%20contacts");

        assert_eq!(list.get("CutoffDays").as_deref(), Some("90"));
        assert_eq!(list.get("cutoffdays").as_deref(), Some("90"));
        assert_eq!(list.get("Label").as_deref(), Some("purge contacts"));
        assert_eq!(list.get("Missing"), None);
        assert!(NameValueList::parse("").is_empty());
    }

    #[test]
    fn test_repeated_names_are_joined() {
        let list = NameValueList::parse("CutoffDays=90&CutoffDays=120");

        assert_eq!(list.get("CutoffDays").as_deref(), Some("90,120"));
    }

    #[test]
    fn test_absent_cutoff_uses_default() {
        let cutoff =
            CutoffDays::resolve(&NameValueList::default(), CutoffDays::default()).unwrap();
        assert_eq!(cutoff.get(), 180);

        let configured = CutoffDays::new(365).unwrap();
        assert_eq!(
            CutoffDays::resolve(&NameValueList::default(), configured).unwrap(),
            configured
        );
    }

    #[test]
    fn test_explicit_cutoff_is_used() {
        let params = NameValueList::from_iter([("CutoffDays", " 90 ")]);

        let cutoff = CutoffDays::resolve(&params, CutoffDays::default()).unwrap();

        assert_eq!(cutoff.get(), 90);
    }

    #[test]
    fn test_non_numeric_cutoff_is_rejected() {
        for raw in ["ninety", "", "9.5", "99999999999", "90,120"] {
            let params = NameValueList::from_iter([("CutoffDays", raw)]);

            assert_eq!(
                CutoffDays::resolve(&params, CutoffDays::default()).unwrap_err(),
                ParameterError::NotANumber {
                    name: "CutoffDays",
                    value: raw.to_owned(),
                },
                "value {raw:?}"
            );
        }
    }

    #[test]
    fn test_non_positive_cutoff_is_rejected() {
        for value in [0, -1, -365] {
            let params = NameValueList::from_iter([("CutoffDays", value.to_string())]);

            assert_eq!(
                CutoffDays::resolve(&params, CutoffDays::default()).unwrap_err(),
                ParameterError::NotPositive {
                    name: "CutoffDays",
                    value,
                }
            );
        }
    }
}
