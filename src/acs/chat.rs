use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::Method;
use serde::de::DeserializeOwned;
use url::Url;
use uuid::Uuid;

use super::{
    transport::{service_url, AcsTransport, Auth, RequestSpec, API_VERSION_PARAM},
    wire::{
        AddParticipantsRequest, ChatMessageDto, ChatThreadItemDto, CreateThreadRequest,
        CreateThreadResponse, PagedDto, ParticipantDto, SendMessageRequest, SendMessageResponse,
    },
};
use crate::{
    domain::{
        message::{ChatMessage, OutgoingMessage},
        thread::{ChatThread, ThreadMember, ThreadRef, ThreadSummary},
    },
    usecases::{
        contracts::{ChatGateway, GatewayError},
        paging::{Page, PageCursor, PageSource, Pages},
    },
};

const REPEATABILITY_HEADER: &str = "repeatability-request-id";
const REPEATABILITY_FIRST_SENT_HEADER: &str = "repeatability-first-sent";

/// Chat service adapter authenticated with the operator's bearer token.
pub struct HttpChatGateway<'a> {
    transport: &'a AcsTransport,
    endpoint: Option<Url>,
    api_version: String,
    page_size: u32,
}

impl<'a> HttpChatGateway<'a> {
    pub fn new(
        transport: &'a AcsTransport,
        endpoint: Option<Url>,
        api_version: impl Into<String>,
        page_size: u32,
    ) -> Self {
        Self {
            transport,
            endpoint,
            api_version: api_version.into(),
            page_size,
        }
    }

    fn endpoint(&self) -> Result<&Url, GatewayError> {
        self.endpoint.as_ref().ok_or_else(|| {
            GatewayError::NotConfigured(
                "chat needs service.endpoint, ACS_ENDPOINT or a connection string".into(),
            )
        })
    }

    fn url(&self, segments: &[&str]) -> Result<Url, GatewayError> {
        service_url(self.endpoint()?, segments, &self.api_version)
    }

    fn listing_url(&self, segments: &[&str]) -> Result<Url, GatewayError> {
        let mut url = self.url(segments)?;
        url.query_pairs_mut()
            .append_pair("maxPageSize", &self.page_size.to_string());
        Ok(url)
    }

    fn pages<Dto, T>(
        &'a self,
        credential: &str,
        first: Result<Url, GatewayError>,
        resource: String,
        convert: fn(Dto) -> Option<T>,
    ) -> Pages<'a, T>
    where
        Dto: DeserializeOwned + 'a,
        T: 'a,
    {
        match first {
            Ok(first) => Pages::new(HttpPageSource {
                gateway: self,
                credential: credential.to_owned(),
                first,
                resource,
                convert,
            }),
            Err(error) => Pages::failed(error),
        }
    }
}

fn thread_path<'t>(thread: &'t ThreadRef, tail: &'t str) -> [&'t str; 4] {
    ["chat", "threads", thread.id(), tail]
}

fn repeatable(spec: RequestSpec) -> RequestSpec {
    spec.header(REPEATABILITY_HEADER, Uuid::new_v4().to_string())
        .header(
            REPEATABILITY_FIRST_SENT_HEADER,
            Utc::now().format("%a, %d %b %Y %H:%M:%S GMT").to_string(),
        )
        .idempotent(true)
}

impl ChatGateway for HttpChatGateway<'_> {
    fn create_thread(
        &self,
        credential: &str,
        topic: &str,
        members: &[ThreadMember],
    ) -> Result<ChatThread, GatewayError> {
        let body = CreateThreadRequest {
            topic,
            participants: members.iter().map(ParticipantDto::from).collect(),
        };
        let spec = RequestSpec::new(Method::POST, self.url(&["chat", "threads"])?, "threads")
            .json_body(&body)?;
        let spec = repeatable(spec);

        let response: CreateThreadResponse =
            self.transport.send_json(&spec, &Auth::Bearer(credential))?;
        tracing::info!(thread_id = %response.chat_thread.id, "created chat thread");
        Ok(response.chat_thread.into())
    }

    fn add_members(
        &self,
        credential: &str,
        thread: &ThreadRef,
        members: &[ThreadMember],
    ) -> Result<(), GatewayError> {
        let body = AddParticipantsRequest {
            participants: members.iter().map(ParticipantDto::from).collect(),
        };
        let spec = RequestSpec::new(
            Method::POST,
            self.url(&["chat", "threads", thread.id(), "participants", ":add"])?,
            format!("thread {}", thread.id()),
        )
        .json_body(&body)?;

        self.transport.send(&spec, &Auth::Bearer(credential))?;
        tracing::info!(thread_id = thread.id(), count = members.len(), "added participants");
        Ok(())
    }

    fn send_message(
        &self,
        credential: &str,
        thread: &ThreadRef,
        message: &OutgoingMessage,
    ) -> Result<String, GatewayError> {
        let spec = RequestSpec::new(
            Method::POST,
            self.url(&thread_path(thread, "messages"))?,
            format!("thread {}", thread.id()),
        )
        .json_body(&SendMessageRequest::from(message))?;

        let response: SendMessageResponse =
            self.transport.send_json(&spec, &Auth::Bearer(credential))?;
        tracing::info!(thread_id = thread.id(), message_id = %response.id, "sent message");
        Ok(response.id)
    }

    fn list_messages<'a>(
        &'a self,
        credential: &str,
        thread: &ThreadRef,
    ) -> Pages<'a, ChatMessage> {
        self.pages(
            credential,
            self.listing_url(&thread_path(thread, "messages")),
            format!("thread {}", thread.id()),
            message_entry,
        )
    }

    fn list_members<'a>(
        &'a self,
        credential: &str,
        thread: &ThreadRef,
    ) -> Pages<'a, ThreadMember> {
        self.pages(
            credential,
            self.listing_url(&thread_path(thread, "participants")),
            format!("thread {}", thread.id()),
            ParticipantDto::into_member,
        )
    }

    fn list_threads<'a>(
        &'a self,
        credential: &str,
        since: DateTime<Utc>,
    ) -> Pages<'a, ThreadSummary> {
        let first = self.listing_url(&["chat", "threads"]).map(|mut url| {
            url.query_pairs_mut().append_pair(
                "startTime",
                &since.to_rfc3339_opts(SecondsFormat::Secs, true),
            );
            url
        });

        self.pages(credential, first, "threads".to_owned(), thread_entry)
    }
}

fn message_entry(dto: ChatMessageDto) -> Option<ChatMessage> {
    Some(dto.into())
}

fn thread_entry(dto: ChatThreadItemDto) -> Option<ThreadSummary> {
    Some(dto.into())
}

/// Follows the service's `nextLink` chain for one listing.
struct HttpPageSource<'a, Dto, T> {
    gateway: &'a HttpChatGateway<'a>,
    credential: String,
    first: Url,
    resource: String,
    convert: fn(Dto) -> Option<T>,
}

impl<Dto: DeserializeOwned, T> PageSource<T> for HttpPageSource<'_, Dto, T> {
    fn fetch(&self, cursor: Option<&PageCursor>) -> Result<Page<T>, GatewayError> {
        let url = match cursor {
            Some(cursor) => resolve_next_link(
                self.gateway.endpoint()?,
                cursor.as_str(),
                &self.gateway.api_version,
            )?,
            None => self.first.clone(),
        };
        let spec = RequestSpec::new(Method::GET, url, self.resource.clone());

        let page: PagedDto<Dto> = self
            .gateway
            .transport
            .send_json(&spec, &Auth::Bearer(&self.credential))?;

        let skipped_before = page.value.len();
        let items: Vec<T> = page.value.into_iter().filter_map(self.convert).collect();
        if items.len() < skipped_before {
            tracing::debug!(
                skipped = skipped_before - items.len(),
                "skipped listing entries without an identifier"
            );
        }

        Ok(Page {
            items,
            next: page
                .next_link
                .filter(|link| !link.is_empty())
                .map(PageCursor::new),
        })
    }
}

/// Resolves a continuation link, which may be relative, against the
/// endpoint and makes sure it still names the api version.
fn resolve_next_link(endpoint: &Url, link: &str, api_version: &str) -> Result<Url, GatewayError> {
    let mut url = endpoint
        .join(link)
        .map_err(|error| GatewayError::InvalidData(format!("next link: {error}")))?;

    if url.host_str() != endpoint.host_str() {
        return Err(GatewayError::InvalidData(
            "next link points at a different host".into(),
        ));
    }
    if !url.query_pairs().any(|(key, _)| key == API_VERSION_PARAM) {
        url.query_pairs_mut()
            .append_pair(API_VERSION_PARAM, api_version);
    }

    Ok(url)
}
