use compact_str::CompactString;
use derive_more::From;
use std::{
    collections::{hash_map, HashMap},
    fmt::{Display, Formatter},
};

/// Key under which regex filters store their matches.
pub const MATCHES: &str = "matches";

/// One regex match, detached from the text it was found in.
/// `start` and `end` are byte offsets into the searched text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegexMatch {
    pub text: CompactString,
    pub start: usize,
    pub end: usize,
    pub groups: Vec<Option<CompactString>>,
    pub named: HashMap<CompactString, CompactString>,
}

impl RegexMatch {
    pub fn from_captures(regex: &regex::Regex, captures: &regex::Captures<'_>) -> Option<Self> {
        let whole = captures.get(0)?;
        let groups = captures
            .iter()
            .skip(1)
            .map(|group| group.map(|m| CompactString::from(m.as_str())))
            .collect();
        let named = regex
            .capture_names()
            .flatten()
            .filter_map(|name| {
                captures
                    .name(name)
                    .map(|m| (CompactString::from(name), CompactString::from(m.as_str())))
            })
            .collect();
        Some(Self {
            text: whole.as_str().into(),
            start: whole.start(),
            end: whole.end(),
            groups,
            named,
        })
    }

    /// Capture group by index, 0 is the whole match.
    pub fn group(&self, index: usize) -> Option<&str> {
        if index == 0 {
            return Some(self.text.as_str());
        }
        self.groups.get(index - 1)?.as_deref()
    }

    pub fn name(&self, name: &str) -> Option<&str> {
        self.named.get(name).map(CompactString::as_str)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, From)]
pub enum FilterValue {
    Match(RegexMatch),
    Int(i64),
    Text(CompactString),
}

impl Display for FilterValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterValue::Match(m) => f.write_str(&m.text),
            FilterValue::Int(value) => write!(f, "{value}"),
            FilterValue::Text(text) => f.write_str(text),
        }
    }
}

impl FilterValue {
    pub fn as_match(&self) -> Option<&RegexMatch> {
        match self {
            FilterValue::Match(m) => Some(m),
            _ => None,
        }
    }
}

/// Values extracted by filters, keyed by what they are. Merging two mappings
/// concatenates the lists of equal keys, left values first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterData(HashMap<CompactString, Vec<FilterValue>>);

impl FilterData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(key: &str, values: Vec<FilterValue>) -> Self {
        let mut data = Self::new();
        data.extend(key, values);
        data
    }

    pub fn push(&mut self, key: &str, value: impl Into<FilterValue>) {
        self.0.entry(key.into()).or_default().push(value.into());
    }

    pub fn extend(&mut self, key: &str, values: impl IntoIterator<Item = FilterValue>) {
        let mut values = values.into_iter().peekable();
        if values.peek().is_some() {
            self.0.entry(key.into()).or_default().extend(values);
        }
    }

    pub fn get(&self, key: &str) -> &[FilterValue] {
        self.0.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    /// Regex matches collected under [`MATCHES`].
    pub fn matches(&self) -> impl Iterator<Item = &RegexMatch> {
        self.get(MATCHES).iter().filter_map(FilterValue::as_match)
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(Vec::is_empty)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(CompactString::as_str)
    }

    pub fn merge(mut self, other: FilterData) -> FilterData {
        for (key, values) in other.0 {
            self.0.entry(key).or_default().extend(values);
        }
        self
    }
}

impl IntoIterator for FilterData {
    type Item = (CompactString, Vec<FilterValue>);
    type IntoIter = hash_map::IntoIter<CompactString, Vec<FilterValue>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::{check, let_assert};

    #[test]
    fn merge_concatenates_left_then_right() {
        let left = FilterData::with("k", vec![FilterValue::Int(1)]);
        let mut right = FilterData::with("k", vec![FilterValue::Int(2)]);
        right.push("other", FilterValue::Text("x".into()));

        let merged = left.merge(right);
        check!(merged.get("k") == [FilterValue::Int(1), FilterValue::Int(2)]);
        check!(merged.get("other") == [FilterValue::Text("x".into())]);
        check!(merged.get("missing").is_empty());
    }

    #[test]
    fn empty_lists_do_not_count() {
        let mut data = FilterData::new();
        data.extend("k", vec![]);
        check!(data.is_empty());
        data.push("k", 3_i64);
        check!(!data.is_empty());
    }

    #[test]
    fn match_groups() {
        let regex = regex::Regex::new(r"(?P<cmd>/\w+)(?: (\w+))?").unwrap();
        let captures = regex.captures("say /start now").unwrap();
        let_assert!(Some(m) = RegexMatch::from_captures(&regex, &captures));
        check!(m.text == "/start now");
        check!(m.start == 4);
        check!(m.group(0) == Some("/start now"));
        check!(m.group(1) == Some("/start"));
        check!(m.group(2) == Some("now"));
        check!(m.group(3) == None);
        check!(m.name("cmd") == Some("/start"));
        check!(FilterValue::from(m).to_string() == "/start now");
    }
}
