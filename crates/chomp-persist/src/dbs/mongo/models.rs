use bson::serde_helpers::chrono_datetime_as_bson_datetime;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use chomp_types::{ClassData, ClassSummary, MessageData, Roster, ThreadData, UserProfile, VoteList};

/// MongoDB user profile (`users` collection)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoUser {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub uid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub email: String,
    #[serde(default)]
    pub classes: Vec<ClassSummary>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created: DateTime<Utc>,
}

/// MongoDB class (`classes` collection)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoClass {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub participants: Vec<String>,
    pub roster: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// MongoDB roster (`rosters` collection, keyed by class id)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoRoster {
    #[serde(rename = "_id")]
    pub id: String,
    pub class_id: String,
    pub participants: Vec<String>,
}

/// MongoDB thread (`threads` collection)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoThread {
    #[serde(rename = "_id")]
    pub id: String,
    pub class_id: String,
    pub class_name: String,
    pub email: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub anonymous: bool,
    pub is_closed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer_id: Option<String>,
    pub num_messages: i64,
    pub score: i64,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created: DateTime<Utc>,
}

/// MongoDB message (`messages` collection)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoMessage {
    #[serde(rename = "_id")]
    pub id: String,
    pub thread_id: String,
    pub class_id: String,
    pub parent_id: String,
    pub score: i64,
    pub message: String,
    pub email: String,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub sent: DateTime<Utc>,
}

/// One voter's vote list (`threadVotes` / `messageVotes`, keyed by voter email).
///
/// `votes` may be missing on documents written by older clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoVoteList {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub votes: Option<VoteList>,
}

// Conversions between database-agnostic and MongoDB-specific models

impl From<UserProfile> for MongoUser {
    fn from(user: UserProfile) -> Self {
        Self {
            id: user.id,
            uid: user.uid,
            name: user.name,
            email: user.email,
            classes: user.classes,
            created: user.created,
        }
    }
}

impl From<MongoUser> for UserProfile {
    fn from(user: MongoUser) -> Self {
        Self {
            id: user.id,
            uid: user.uid,
            name: user.name,
            email: user.email,
            classes: user.classes,
            created: user.created,
        }
    }
}

impl From<ClassData> for MongoClass {
    fn from(class: ClassData) -> Self {
        Self {
            id: class.id,
            name: class.name,
            section: class.section,
            description: class.description,
            participants: class.participants,
            roster: class.roster,
            tags: class.tags,
        }
    }
}

impl From<MongoClass> for ClassData {
    fn from(class: MongoClass) -> Self {
        Self {
            id: class.id,
            name: class.name,
            section: class.section,
            description: class.description,
            participants: class.participants,
            roster: class.roster,
            tags: class.tags,
        }
    }
}

impl From<Roster> for MongoRoster {
    fn from(roster: Roster) -> Self {
        Self {
            id: roster.id,
            class_id: roster.class_id,
            participants: roster.participants,
        }
    }
}

impl From<ThreadData> for MongoThread {
    fn from(thread: ThreadData) -> Self {
        Self {
            id: thread.id,
            class_id: thread.class_id,
            class_name: thread.class_name,
            email: thread.email,
            title: thread.title,
            message: thread.message,
            tags: thread.tags,
            anonymous: thread.anonymous,
            is_closed: thread.is_closed,
            answer_id: thread.answer_id,
            num_messages: thread.num_messages,
            score: thread.score,
            created: thread.created,
        }
    }
}

impl From<MongoThread> for ThreadData {
    fn from(thread: MongoThread) -> Self {
        Self {
            id: thread.id,
            class_id: thread.class_id,
            class_name: thread.class_name,
            email: thread.email,
            title: thread.title,
            message: thread.message,
            tags: thread.tags,
            anonymous: thread.anonymous,
            is_closed: thread.is_closed,
            answer_id: thread.answer_id,
            num_messages: thread.num_messages,
            score: thread.score,
            created: thread.created,
        }
    }
}

impl From<MessageData> for MongoMessage {
    fn from(msg: MessageData) -> Self {
        Self {
            id: msg.id,
            thread_id: msg.thread_id,
            class_id: msg.class_id,
            parent_id: msg.parent_id,
            score: msg.score,
            message: msg.message,
            email: msg.email,
            sent: msg.sent,
        }
    }
}

impl From<MongoMessage> for MessageData {
    fn from(msg: MongoMessage) -> Self {
        Self {
            id: msg.id,
            thread_id: msg.thread_id,
            class_id: msg.class_id,
            parent_id: msg.parent_id,
            score: msg.score,
            message: msg.message,
            email: msg.email,
            sent: msg.sent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::{doc, Bson};
    use chomp_types::Vote;

    #[test]
    fn thread_created_is_stored_as_bson_datetime() {
        let thread = MongoThread {
            id: "t1".to_string(),
            class_id: "c1".to_string(),
            class_name: "Physics".to_string(),
            email: "a@x.edu".to_string(),
            title: "Why is the sky blue?".to_string(),
            message: None,
            tags: vec![],
            anonymous: false,
            is_closed: false,
            answer_id: None,
            num_messages: 0,
            score: 0,
            created: Utc::now(),
        };

        let doc = bson::to_document(&thread).unwrap();
        assert!(matches!(doc.get("created"), Some(Bson::DateTime(_))));
        assert_eq!(doc.get_str("_id").unwrap(), "t1");
        assert!(!doc.contains_key("message"));
    }

    #[test]
    fn vote_list_document_without_votes_field() {
        let parsed: MongoVoteList = bson::from_document(doc! { "_id": "a@x.edu" }).unwrap();
        assert!(parsed.votes.is_none());

        let parsed: MongoVoteList = bson::from_document(doc! {
            "_id": "a@x.edu",
            "votes": [ { "id": "t1", "value": 1 }, { "id": "t2", "value": -1_i32 } ],
        })
        .unwrap();
        assert_eq!(
            parsed.votes.unwrap().into_inner(),
            vec![Vote::up("t1"), Vote::down("t2")]
        );
    }
}
