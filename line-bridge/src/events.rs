//! Subset of the LINE webhook event model the bridge acts on.

use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WebhookPayload {
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub events: Vec<WebhookEvent>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum WebhookEvent {
    Message(MessageEvent),
    /// follow, unfollow, postback, ...
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageEvent {
    pub reply_token: String,
    pub source: EventSource,
    pub message: MessageContent,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum MessageContent {
    Text {
        #[serde(default)]
        id: Option<String>,
        text: String,
    },
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EventSource {
    #[serde(rename_all = "camelCase")]
    User { user_id: String },
    #[serde(rename_all = "camelCase")]
    Group {
        group_id: String,
        #[serde(default)]
        user_id: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Room {
        room_id: String,
        #[serde(default)]
        user_id: Option<String>,
    },
}

impl EventSource {
    /// Group id, else room id, else user id.
    pub fn conversation_id(&self) -> &str {
        match self {
            EventSource::Group { group_id, .. } => group_id,
            EventSource::Room { room_id, .. } => room_id,
            EventSource::User { user_id } => user_id,
        }
    }

    pub fn user_id(&self) -> Option<&str> {
        match self {
            EventSource::User { user_id } => Some(user_id),
            EventSource::Group { user_id, .. } | EventSource::Room { user_id, .. } => {
                user_id.as_deref()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(raw: &str) -> WebhookPayload {
        serde_json::from_str(raw).unwrap()
    }

    #[test]
    fn text_message_from_user() {
        let p = parse(
            r#"{"destination":"Ubot","events":[{
                "type":"message","mode":"active","timestamp":1,
                "replyToken":"tok-1",
                "source":{"type":"user","userId":"U123"},
                "message":{"type":"text","id":"m1","text":"報告多久出來?"}
            }]}"#,
        );
        let WebhookEvent::Message(ev) = &p.events[0] else {
            panic!("expected message event");
        };
        assert_eq!(ev.reply_token, "tok-1");
        assert_eq!(ev.source.conversation_id(), "U123");
        assert_eq!(
            ev.message,
            MessageContent::Text {
                id: Some("m1".into()),
                text: "報告多久出來?".into()
            }
        );
    }

    #[test]
    fn group_and_room_take_priority_over_user() {
        let group: EventSource =
            serde_json::from_str(r#"{"type":"group","groupId":"G1","userId":"U1"}"#).unwrap();
        assert_eq!(group.conversation_id(), "G1");
        assert_eq!(group.user_id(), Some("U1"));

        let room: EventSource =
            serde_json::from_str(r#"{"type":"room","roomId":"R1"}"#).unwrap();
        assert_eq!(room.conversation_id(), "R1");
        assert_eq!(room.user_id(), None);
    }

    #[test]
    fn other_events_and_contents_are_tolerated() {
        let p = parse(
            r#"{"events":[
                {"type":"follow","replyToken":"t","source":{"type":"user","userId":"U"}},
                {"type":"message","replyToken":"t2","source":{"type":"user","userId":"U"},
                 "message":{"type":"sticker","id":"s","packageId":"1","stickerId":"2"}}
            ]}"#,
        );
        assert_eq!(p.events[0], WebhookEvent::Unsupported);
        let WebhookEvent::Message(ev) = &p.events[1] else {
            panic!("expected message event");
        };
        assert_eq!(ev.message, MessageContent::Unsupported);
    }

    #[test]
    fn empty_body_has_no_events() {
        assert!(parse("{}").events.is_empty());
    }
}
