//! Inbox aggregation over a flat message list.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::db::{ConversationSummary, Message};

/// The other participant of a message, seen from `user_id`
pub fn counterparty(user_id: i64, message: &Message) -> i64 {
    if message.receiver_id == user_id {
        message.sender_id
    } else {
        message.receiver_id
    }
}

/// Chronological order. Messages sharing a timestamp are ordered by id.
pub fn chronological(a: &Message, b: &Message) -> Ordering {
    a.created_at
        .cmp(&b.created_at)
        .then_with(|| a.id.cmp(&b.id))
}

fn is_unread_for(user_id: i64, message: &Message) -> bool {
    message.receiver_id == user_id && !message.is_read
}

/// Build one summary per counterparty, most recently active first.
///
/// Messages that do not involve `user_id` are ignored.
pub fn summarize<'a, I>(user_id: i64, messages: I) -> Vec<ConversationSummary>
where
    I: IntoIterator<Item = &'a Message>,
{
    let mut by_counterparty: HashMap<i64, ConversationSummary> = HashMap::new();

    for message in messages {
        if message.sender_id != user_id && message.receiver_id != user_id {
            continue;
        }

        let other = counterparty(user_id, message);
        let unread = usize::from(is_unread_for(user_id, message));

        by_counterparty
            .entry(other)
            .and_modify(|summary| {
                if chronological(message, &summary.last_message) == Ordering::Greater {
                    summary.last_message = message.clone();
                }
                summary.unread_count += unread;
            })
            .or_insert_with(|| ConversationSummary {
                counterparty_id: other,
                last_message: message.clone(),
                unread_count: unread,
            });
    }

    let mut summaries: Vec<ConversationSummary> = by_counterparty.into_values().collect();
    summaries.sort_by(|a, b| chronological(&b.last_message, &a.last_message));
    summaries
}

/// Unread messages addressed to `user_id`, across all counterparties
pub fn count_unread<'a, I>(user_id: i64, messages: I) -> usize
where
    I: IntoIterator<Item = &'a Message>,
{
    messages
        .into_iter()
        .filter(|m| is_unread_for(user_id, m))
        .count()
}
