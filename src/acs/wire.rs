//! JSON shapes exchanged with the identity and chat REST services.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    identity::{AccessToken, UserId},
    message::{ChatMessage, MessageKind, OutgoingMessage},
    thread::{ChatThread, ThreadMember, ThreadSummary},
};

#[derive(Debug, Deserialize)]
pub struct CreateIdentityResponse {
    pub identity: IdentityDto,
}

#[derive(Debug, Deserialize)]
pub struct IdentityDto {
    pub id: String,
}

#[derive(Debug, Serialize)]
pub struct IssueTokenRequest<'a> {
    pub scopes: Vec<&'a str>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessTokenDto {
    pub token: String,
    pub expires_on: DateTime<Utc>,
}

impl From<AccessTokenDto> for AccessToken {
    fn from(dto: AccessTokenDto) -> Self {
        Self {
            token: dto.token,
            expires_on: dto.expires_on,
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunicationIdentifierDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub communication_user: Option<CommunicationUserDto>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CommunicationUserDto {
    pub id: String,
}

impl CommunicationIdentifierDto {
    pub fn user(id: &UserId) -> Self {
        Self {
            raw_id: Some(id.as_str().to_owned()),
            communication_user: Some(CommunicationUserDto {
                id: id.as_str().to_owned(),
            }),
        }
    }

    /// Prefers the communication user id, then the raw id.
    pub fn into_user_id(self) -> Option<UserId> {
        self.communication_user
            .map(|user| user.id)
            .or(self.raw_id)
            .filter(|id| !id.is_empty())
            .map(UserId::new)
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantDto {
    pub communication_identifier: CommunicationIdentifierDto,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl From<&ThreadMember> for ParticipantDto {
    fn from(member: &ThreadMember) -> Self {
        Self {
            communication_identifier: CommunicationIdentifierDto::user(&member.user_id),
            display_name: Some(member.display_name.clone()),
        }
    }
}

impl ParticipantDto {
    pub fn into_member(self) -> Option<ThreadMember> {
        Some(ThreadMember {
            user_id: self.communication_identifier.into_user_id()?,
            display_name: self.display_name.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct CreateThreadRequest<'a> {
    pub topic: &'a str,
    pub participants: Vec<ParticipantDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateThreadResponse {
    pub chat_thread: ChatThreadDto,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatThreadDto {
    pub id: String,
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub created_on: Option<DateTime<Utc>>,
}

impl From<ChatThreadDto> for ChatThread {
    fn from(dto: ChatThreadDto) -> Self {
        Self {
            id: dto.id,
            topic: dto.topic,
            created_on: dto.created_on,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AddParticipantsRequest {
    pub participants: Vec<ParticipantDto>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest<'a> {
    pub content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_display_name: Option<&'a str>,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub metadata: MessageMetadata,
}

#[derive(Debug, Serialize)]
pub struct MessageMetadata {
    pub priority: &'static str,
}

impl<'a> From<&'a OutgoingMessage> for SendMessageRequest<'a> {
    fn from(message: &'a OutgoingMessage) -> Self {
        Self {
            content: &message.content,
            sender_display_name: message.sender_display_name.as_deref(),
            kind: "text",
            metadata: MessageMetadata {
                priority: message.priority.as_str(),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SendMessageResponse {
    pub id: String,
}

/// One page of any chat listing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedDto<T> {
    #[serde(default = "Vec::new")]
    pub value: Vec<T>,
    #[serde(default)]
    pub next_link: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessageDto {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub content: Option<MessageContentDto>,
    #[serde(default)]
    pub sender_display_name: Option<String>,
    #[serde(default)]
    pub created_on: Option<DateTime<Utc>>,
    #[serde(default)]
    pub sender_communication_identifier: Option<CommunicationIdentifierDto>,
}

#[derive(Debug, Deserialize)]
pub struct MessageContentDto {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub topic: Option<String>,
}

impl From<ChatMessageDto> for ChatMessage {
    fn from(dto: ChatMessageDto) -> Self {
        let content = dto
            .content
            .and_then(|content| content.message.or(content.topic))
            .unwrap_or_default();

        Self {
            id: dto.id,
            kind: MessageKind::from_wire(&dto.kind),
            sender_id: dto
                .sender_communication_identifier
                .and_then(CommunicationIdentifierDto::into_user_id),
            sender_display_name: dto.sender_display_name,
            content,
            created_on: dto.created_on,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatThreadItemDto {
    pub id: String,
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub last_message_received_on: Option<DateTime<Utc>>,
    #[serde(default)]
    pub deleted_on: Option<DateTime<Utc>>,
}

impl From<ChatThreadItemDto> for ThreadSummary {
    fn from(dto: ChatThreadItemDto) -> Self {
        Self {
            id: dto.id,
            topic: dto.topic,
            last_message_received_on: dto.last_message_received_on,
            deleted_on: dto.deleted_on,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::message::MessagePriority;

    #[test]
    fn decodes_message_page_with_system_entry() {
        let body = json!({
            "value": [
                {
                    "id": "1700000000001",
                    "type": "text",
                    "content": {"message": "hello"},
                    "senderDisplayName": "alice",
                    "createdOn": "2026-10-19T08:00:00Z",
                    "senderCommunicationIdentifier": {
                        "rawId": "8:acs:alice",
                        "communicationUser": {"id": "8:acs:alice"}
                    }
                },
                {
                    "id": "1700000000000",
                    "type": "topicUpdated",
                    "content": {"topic": "standup"},
                    "createdOn": "2026-10-19T07:59:00Z"
                }
            ],
            "nextLink": "https://contoso.communication.azure.com/chat/threads/19:t/messages?syncState=abc"
        });

        let page: PagedDto<ChatMessageDto> = serde_json::from_value(body).expect("page");
        let messages: Vec<ChatMessage> = page.value.into_iter().map(ChatMessage::from).collect();

        assert!(page.next_link.is_some_and(|link| link.contains("syncState")));
        assert_eq!(messages[0].sender_label(), "8:acs:alice");
        assert_eq!(messages[0].content, "hello");
        assert_eq!(messages[1].kind, MessageKind::TopicUpdated);
        assert_eq!(messages[1].sender_label(), "system");
        assert_eq!(messages[1].content, "standup");
    }

    #[test]
    fn empty_listing_without_next_link_decodes() {
        let page: PagedDto<ChatThreadItemDto> =
            serde_json::from_value(json!({"value": []})).expect("page");

        assert!(page.value.is_empty());
        assert!(page.next_link.is_none());
    }

    #[test]
    fn participant_encodes_communication_user() {
        let member = ThreadMember {
            user_id: UserId::new("8:acs:bob"),
            display_name: "bob".to_owned(),
        };

        let encoded = serde_json::to_value(ParticipantDto::from(&member)).expect("encode");

        assert_eq!(
            encoded,
            json!({
                "communicationIdentifier": {
                    "rawId": "8:acs:bob",
                    "communicationUser": {"id": "8:acs:bob"}
                },
                "displayName": "bob"
            })
        );
    }

    #[test]
    fn participant_without_user_id_is_skipped() {
        let dto: ParticipantDto = serde_json::from_value(json!({
            "communicationIdentifier": {"rawId": ""},
            "displayName": "ghost"
        }))
        .expect("participant");

        assert!(dto.into_member().is_none());
    }

    #[test]
    fn outgoing_message_carries_priority_as_metadata() {
        let message = OutgoingMessage {
            content: "hi".to_owned(),
            priority: MessagePriority::Normal,
            sender_display_name: Some("alice".to_owned()),
        };

        let encoded = serde_json::to_value(SendMessageRequest::from(&message)).expect("encode");

        assert_eq!(
            encoded,
            json!({
                "content": "hi",
                "senderDisplayName": "alice",
                "type": "text",
                "metadata": {"priority": "normal"}
            })
        );
    }

    #[test]
    fn token_response_decodes_expiry() {
        let dto: AccessTokenDto = serde_json::from_value(json!({
            "token": "eyJ0eXAi",
            "expiresOn": "2026-10-20T08:00:00.000Z"
        }))
        .expect("token");

        let token = AccessToken::from(dto);

        assert_eq!(token.expires_on.to_rfc3339(), "2026-10-20T08:00:00+00:00");
    }
}
