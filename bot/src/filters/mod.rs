//! Filters decide which handler gets an update.
//!
//! A [`Filter`] is an immutable tree of leaf checks joined with `&`, `|`, `^`
//! and `!`. Evaluating it yields a [`FilterResult`]: rejected, matched, or
//! matched with extracted [`FilterData`] (regex matches, for example).
//!
//! * `a & b` skips `b` when `a` is rejected; when both match their data is merged.
//! * `a | b` returns `a`'s result unchanged when it matches, `b` is not evaluated.
//! * `a ^ b` always evaluates both and returns the result of the side that matched.
//! * `!a` only keeps the verdict, data is dropped.
//!
//! Errors of a leaf propagate unchanged through every combinator.

use api::proto::{Message, Update};
use std::{
    fmt::{Debug, Display, Formatter},
    ops::{BitAnd, BitOr, BitXor, Not},
    sync::Arc,
};

pub mod chat;
pub mod data;
pub mod message;
pub mod status;
pub mod text;
pub mod update;

pub use data::{FilterData, FilterValue, RegexMatch, MATCHES};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FilterResult {
    Rejected,
    Matched,
    Data(FilterData),
}

impl FilterResult {
    /// Data mappings without values count as a rejection.
    pub fn from_data(data: FilterData) -> Self {
        if data.is_empty() {
            FilterResult::Rejected
        } else {
            FilterResult::Data(data)
        }
    }

    pub fn is_match(&self) -> bool {
        match self {
            FilterResult::Rejected => false,
            FilterResult::Matched => true,
            FilterResult::Data(data) => !data.is_empty(),
        }
    }

    pub fn data(&self) -> Option<&FilterData> {
        match self {
            FilterResult::Data(data) => Some(data),
            _ => None,
        }
    }

    pub fn into_data(self) -> FilterData {
        match self {
            FilterResult::Data(data) => data,
            _ => FilterData::default(),
        }
    }

    /// Joins two matching results, data of `self` goes first.
    fn merge(self, other: FilterResult) -> FilterResult {
        match (self, other) {
            (FilterResult::Data(left), FilterResult::Data(right)) => {
                FilterResult::Data(left.merge(right))
            }
            (FilterResult::Data(data), _) | (_, FilterResult::Data(data)) => {
                FilterResult::Data(data)
            }
            _ => FilterResult::Matched,
        }
    }
}

impl From<bool> for FilterResult {
    fn from(matched: bool) -> Self {
        if matched {
            FilterResult::Matched
        } else {
            FilterResult::Rejected
        }
    }
}

/// A leaf test over a whole update.
pub trait Check: Send + Sync + Debug {
    fn check(&self, update: &Update) -> eyre::Result<FilterResult>;
}

/// A leaf test over the effective message of an update.
/// Updates without a message are rejected before it runs.
pub trait MessageCheck: Send + Sync + Debug {
    fn check_message(&self, message: &Message) -> eyre::Result<FilterResult>;
}

struct OnMessage<C>(C);

impl<C: Debug> Debug for OnMessage<C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Debug::fmt(&self.0, f)
    }
}

impl<C: MessageCheck> Check for OnMessage<C> {
    fn check(&self, update: &Update) -> eyre::Result<FilterResult> {
        match update.effective_message() {
            Some(message) => self.0.check_message(message),
            None => Ok(FilterResult::Rejected),
        }
    }
}

#[derive(Clone)]
pub enum Filter {
    Leaf(Arc<dyn Check>),
    And(Arc<Filter>, Arc<Filter>),
    Or(Arc<Filter>, Arc<Filter>),
    Xor(Arc<Filter>, Arc<Filter>),
    Not(Arc<Filter>),
}

impl Filter {
    pub fn leaf(check: impl Check + 'static) -> Self {
        Filter::Leaf(Arc::new(check))
    }

    pub fn message(check: impl MessageCheck + 'static) -> Self {
        Filter::leaf(OnMessage(check))
    }

    pub fn and(self, other: Filter) -> Self {
        Filter::And(Arc::new(self), Arc::new(other))
    }

    pub fn or(self, other: Filter) -> Self {
        Filter::Or(Arc::new(self), Arc::new(other))
    }

    pub fn xor(self, other: Filter) -> Self {
        Filter::Xor(Arc::new(self), Arc::new(other))
    }

    pub fn negate(self) -> Self {
        Filter::Not(Arc::new(self))
    }

    pub fn check(&self, update: &Update) -> eyre::Result<FilterResult> {
        match self {
            Filter::Leaf(check) => check.check(update),
            Filter::And(left, right) => {
                let left = left.check(update)?;
                if !left.is_match() {
                    return Ok(FilterResult::Rejected);
                }
                let right = right.check(update)?;
                if !right.is_match() {
                    return Ok(FilterResult::Rejected);
                }
                Ok(left.merge(right))
            }
            Filter::Or(left, right) => {
                let left = left.check(update)?;
                if left.is_match() {
                    return Ok(left);
                }
                let right = right.check(update)?;
                Ok(if right.is_match() {
                    right
                } else {
                    FilterResult::Rejected
                })
            }
            Filter::Xor(left, right) => {
                let left = left.check(update)?;
                let right = right.check(update)?;
                Ok(match (left.is_match(), right.is_match()) {
                    (true, false) => left,
                    (false, true) => right,
                    _ => FilterResult::Rejected,
                })
            }
            Filter::Not(inner) => Ok(FilterResult::from(!inner.check(update)?.is_match())),
        }
    }

    /// Nesting depth of the tree, a leaf is 1.
    pub fn depth(&self) -> usize {
        match self {
            Filter::Leaf(_) => 1,
            Filter::And(left, right) | Filter::Or(left, right) | Filter::Xor(left, right) => {
                1 + left.depth().max(right.depth())
            }
            Filter::Not(inner) => 1 + inner.depth(),
        }
    }
}

impl Debug for Filter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

impl Display for Filter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Filter::Leaf(check) => write!(f, "{check:?}"),
            Filter::And(left, right) => write!(f, "<{left} and {right}>"),
            Filter::Or(left, right) => write!(f, "<{left} or {right}>"),
            Filter::Xor(left, right) => write!(f, "<{left} xor {right}>"),
            Filter::Not(inner) => write!(f, "<inverted {inner}>"),
        }
    }
}

impl BitAnd for Filter {
    type Output = Filter;

    fn bitand(self, rhs: Filter) -> Filter {
        self.and(rhs)
    }
}

impl BitOr for Filter {
    type Output = Filter;

    fn bitor(self, rhs: Filter) -> Filter {
        self.or(rhs)
    }
}

impl BitXor for Filter {
    type Output = Filter;

    fn bitxor(self, rhs: Filter) -> Filter {
        self.xor(rhs)
    }
}

impl Not for Filter {
    type Output = Filter;

    fn not(self) -> Filter {
        self.negate()
    }
}

#[cfg(test)]
mod tests {
    use super::{
        message::{forwarded, text},
        text::regex,
        *,
    };
    use api::proto::{MessageOrigin, User};
    use assert2::{check, let_assert};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Returns a fixed result and counts how often it ran.
    #[derive(Debug)]
    struct Recorder {
        result: Result<FilterResult, &'static str>,
        calls: Arc<AtomicUsize>,
    }

    fn recorder(result: FilterResult) -> (Filter, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let filter = Filter::leaf(Recorder {
            result: Ok(result),
            calls: calls.clone(),
        });
        (filter, calls)
    }

    fn failing() -> (Filter, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let filter = Filter::leaf(Recorder {
            result: Err("leaf blew up"),
            calls: calls.clone(),
        });
        (filter, calls)
    }

    impl Check for Recorder {
        fn check(&self, _update: &Update) -> eyre::Result<FilterResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.clone().map_err(|err| eyre::eyre!(err))
        }
    }

    fn data(key: &str, value: i64) -> FilterResult {
        FilterResult::Data(FilterData::with(key, vec![FilterValue::Int(value)]))
    }

    fn message_update(message: Message) -> Update {
        Update::MessageUpdate(message)
    }

    fn text_update(value: &str) -> Update {
        message_update(Message {
            text: Some(value.into()),
            ..Default::default()
        })
    }

    fn results() -> Vec<FilterResult> {
        vec![FilterResult::Rejected, FilterResult::Matched, data("k", 1)]
    }

    #[test]
    fn double_negation_keeps_truthiness() {
        let update = text_update("anything");
        for result in results() {
            let (filter, _) = recorder(result.clone());
            let twice = !!filter;
            check!(twice.check(&update).unwrap().is_match() == result.is_match());
        }
    }

    #[test]
    fn negation_drops_data() {
        let (filter, _) = recorder(data("k", 1));
        let result = (!!filter).check(&text_update("x")).unwrap();
        check!(result == FilterResult::Matched);
    }

    #[test]
    fn and_skips_right_when_left_rejects() {
        let (left, _) = recorder(FilterResult::Rejected);
        let (right, right_calls) = recorder(FilterResult::Matched);
        let result = (left & right).check(&text_update("x")).unwrap();
        check!(result == FilterResult::Rejected);
        check!(right_calls.load(Ordering::SeqCst) == 0);
    }

    #[test]
    fn and_needs_both_sides() {
        let update = text_update("x");
        for left in results() {
            for right in results() {
                let expected = left.is_match() && right.is_match();
                let (l, _) = recorder(left.clone());
                let (r, _) = recorder(right.clone());
                check!((l & r).check(&update).unwrap().is_match() == expected);
            }
        }
    }

    #[test]
    fn and_merges_data() {
        let (left, _) = recorder(data("k", 1));
        let (right, _) = recorder(data("k", 2));
        let_assert!(FilterResult::Data(merged) = (left & right).check(&text_update("x")).unwrap());
        check!(merged.get("k") == [FilterValue::Int(1), FilterValue::Int(2)]);
    }

    #[test]
    fn and_keeps_data_of_one_side() {
        let (left, _) = recorder(FilterResult::Matched);
        let (right, _) = recorder(data("k", 2));
        check!((left & right).check(&text_update("x")).unwrap() == data("k", 2));

        let (left, _) = recorder(FilterResult::Matched);
        let (right, _) = recorder(FilterResult::Matched);
        check!((left & right).check(&text_update("x")).unwrap() == FilterResult::Matched);
    }

    #[test]
    fn or_returns_left_without_evaluating_right() {
        for left_result in [FilterResult::Matched, data("k", 1)] {
            let (left, _) = recorder(left_result.clone());
            let (right, right_calls) = recorder(data("k", 2));
            let result = (left | right).check(&text_update("x")).unwrap();
            check!(result == left_result);
            check!(right_calls.load(Ordering::SeqCst) == 0);
        }
    }

    #[test]
    fn or_does_not_merge_data() {
        // only the left side's data survives even though the right side would match
        let (left, _) = recorder(data("k", 1));
        let (right, _) = recorder(data("k", 2));
        check!((left | right).check(&text_update("x")).unwrap() == data("k", 1));
    }

    #[test]
    fn or_falls_back_to_right() {
        let (left, left_calls) = recorder(FilterResult::Rejected);
        let (right, right_calls) = recorder(data("k", 2));
        check!((left | right).check(&text_update("x")).unwrap() == data("k", 2));
        check!(left_calls.load(Ordering::SeqCst) == 1);
        check!(right_calls.load(Ordering::SeqCst) == 1);
    }

    #[test]
    fn xor_evaluates_both_sides() {
        let update = text_update("x");
        for left in results() {
            for right in results() {
                let (l, left_calls) = recorder(left.clone());
                let (r, right_calls) = recorder(right.clone());
                let result = (l ^ r).check(&update).unwrap();
                check!(result.is_match() == (left.is_match() != right.is_match()));
                check!(left_calls.load(Ordering::SeqCst) == 1);
                check!(right_calls.load(Ordering::SeqCst) == 1);
            }
        }
    }

    #[test]
    fn xor_returns_the_matching_side() {
        let (left, _) = recorder(FilterResult::Rejected);
        let (right, _) = recorder(data("k", 7));
        check!((left ^ right).check(&text_update("x")).unwrap() == data("k", 7));
    }

    #[test]
    fn errors_propagate_through_combinators() {
        let update = text_update("x");
        let trees: [fn(Filter, Filter) -> Filter; 4] = [
            |f: Filter, m: Filter| m & f,
            |f: Filter, m: Filter| f | m,
            |f: Filter, m: Filter| m ^ f,
            |f: Filter, _m: Filter| !f,
        ];
        for build in trees {
            let (fail, _) = failing();
            let (matched, _) = recorder(FilterResult::Matched);
            let_assert!(Err(err) = build(fail, matched).check(&update));
            check!(err.to_string() == "leaf blew up");
        }
    }

    #[test]
    fn skipped_child_cannot_fail() {
        let update = text_update("x");
        let (rejected, _) = recorder(FilterResult::Rejected);
        let (fail, fail_calls) = failing();
        check!((rejected & fail).check(&update).unwrap() == FilterResult::Rejected);
        check!(fail_calls.load(Ordering::SeqCst) == 0);

        let (matched, _) = recorder(FilterResult::Matched);
        let (fail, fail_calls) = failing();
        check!((matched | fail).check(&update).unwrap() == FilterResult::Matched);
        check!(fail_calls.load(Ordering::SeqCst) == 0);
    }

    #[test]
    fn empty_data_is_rejection() {
        check!(FilterResult::from_data(FilterData::new()) == FilterResult::Rejected);
        check!(!FilterResult::Data(FilterData::new()).is_match());
        let (empty, _) = recorder(FilterResult::Data(FilterData::new()));
        let (right, right_calls) = recorder(FilterResult::Matched);
        check!((empty & right).check(&text_update("x")).unwrap() == FilterResult::Rejected);
        check!(right_calls.load(Ordering::SeqCst) == 0);
    }

    #[test]
    fn text_leaf() {
        check!(text().check(&text_update("hello")).unwrap() == FilterResult::Matched);
        let no_text = message_update(Message::default());
        check!(text().check(&no_text).unwrap() == FilterResult::Rejected);
    }

    #[test]
    fn message_leaves_reject_updates_without_message() {
        let update = Update::Unsupported("message_reaction".into());
        check!(text().check(&update).unwrap() == FilterResult::Rejected);
        check!((!text()).check(&update).unwrap() == FilterResult::Matched);
    }

    #[test]
    fn regex_leaf_extracts_matches() {
        let start = regex("^/start").unwrap();
        let_assert!(FilterResult::Data(data) = start.check(&text_update("/start payload")).unwrap());
        let matches = data.matches().collect::<Vec<_>>();
        check!(matches.len() == 1);
        check!(matches[0].text == "/start");
        check!(matches[0].start == 0);
        check!(data.keys().collect::<Vec<_>>() == [MATCHES]);

        check!(start.check(&text_update("nope")).unwrap() == FilterResult::Rejected);
    }

    #[test]
    fn text_and_forwarded_rejects_plain_text() {
        let filter = text() & forwarded();
        check!(filter.check(&text_update("hello")).unwrap() == FilterResult::Rejected);

        let forwarded_text = message_update(Message {
            text: Some("hello".into()),
            forward_origin: Some(MessageOrigin::User {
                date: 0,
                sender_user: User::default(),
            }),
            ..Default::default()
        });
        check!(filter.check(&forwarded_text).unwrap() == FilterResult::Matched);
    }

    #[test]
    fn forwarded_check_skipped_without_text() {
        let (forward_stub, calls) = recorder(FilterResult::Matched);
        let filter = text() & forward_stub;
        check!(filter.check(&message_update(Message::default())).unwrap() == FilterResult::Rejected);
        check!(calls.load(Ordering::SeqCst) == 0);
    }

    #[test]
    fn regex_data_survives_and() {
        let filter = text() & regex(r"\d+").unwrap() & regex("[a-z]+").unwrap();
        let_assert!(FilterResult::Data(data) = filter.check(&text_update("abc 42")).unwrap());
        let found = data.matches().map(|m| m.text.as_str()).collect::<Vec<_>>();
        check!(found == ["42", "abc"]);
    }

    #[test]
    fn trees_are_shared_between_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Filter>();

        let filter = text() & !forwarded();
        let handles = (0..4)
            .map(|i| {
                let filter = filter.clone();
                std::thread::spawn(move || {
                    filter
                        .check(&text_update(&format!("message {i}")))
                        .unwrap()
                        .is_match()
                })
            })
            .collect::<Vec<_>>();
        for handle in handles {
            check!(handle.join().unwrap());
        }
    }

    #[test]
    fn display_and_depth() {
        let filter = text() & !forwarded();
        check!(filter.to_string() == "<Text and <inverted Forwarded>>");
        check!(filter.depth() == 3);
    }
}
