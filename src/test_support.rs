use std::{
    cell::RefCell,
    collections::{HashMap, VecDeque},
    io,
    sync::{Mutex, MutexGuard},
};

use chrono::{DateTime, Duration, Utc};

use crate::{
    domain::{
        identity::{AccessToken, TokenScope, UserId},
        message::{ChatMessage, MessageKind, OutgoingMessage},
        thread::{ChatThread, ThreadMember, ThreadRef, ThreadSummary},
    },
    usecases::{
        contracts::{ChatGateway, GatewayError, IdentityGateway},
        paging::{Page, PageCursor, PageSource, Pages},
        prompts::OperatorConsole,
    },
};

static ENV_LOCK: Mutex<()> = Mutex::new(());

pub fn env_lock() -> MutexGuard<'static, ()> {
    ENV_LOCK.lock().expect("env lock should not be poisoned")
}

/// Console fed from a script of answers; `None` simulates closed input.
pub struct ScriptedConsole {
    inputs: VecDeque<Option<String>>,
    pub output: Vec<String>,
    pub prompts: Vec<String>,
}

impl ScriptedConsole {
    pub fn new(inputs: Vec<Option<&str>>) -> Self {
        Self {
            inputs: inputs
                .into_iter()
                .map(|item| item.map(|value| value.to_owned()))
                .collect(),
            output: Vec::new(),
            prompts: Vec::new(),
        }
    }

    pub fn printed(&self, needle: &str) -> bool {
        self.output.iter().any(|line| line.contains(needle))
    }

    fn next_input(&mut self, prompt: &str) -> Option<String> {
        self.prompts.push(prompt.to_owned());
        self.inputs.pop_front().flatten()
    }
}

impl OperatorConsole for ScriptedConsole {
    fn print_line(&mut self, line: &str) -> io::Result<()> {
        self.output.push(line.to_owned());
        Ok(())
    }

    fn prompt_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        Ok(self.next_input(prompt))
    }

    fn prompt_secret(&mut self, prompt: &str) -> io::Result<Option<String>> {
        Ok(self.next_input(prompt))
    }

    fn read_choice(&mut self, prompt: &str) -> io::Result<Option<char>> {
        Ok(self
            .next_input(prompt)
            .map(|line| line.chars().next().unwrap_or('\n')))
    }
}

struct FakeThread {
    summary: ThreadSummary,
    members: Vec<ThreadMember>,
    messages: Vec<ChatMessage>,
}

#[derive(Default)]
struct FakeState {
    next_id: u32,
    tokens: HashMap<String, UserId>,
    threads: Vec<FakeThread>,
    calls: Vec<&'static str>,
    fail_next: Option<GatewayError>,
}

impl FakeState {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-{}", self.next_id)
    }

    fn thread_mut(&mut self, thread: &ThreadRef) -> Result<&mut FakeThread, GatewayError> {
        self.threads
            .iter_mut()
            .find(|candidate| candidate.summary.id == thread.id())
            .ok_or_else(|| GatewayError::NotFound {
                resource: format!("thread {}", thread.id()),
            })
    }

    fn begin(&mut self, call: &'static str, credential: Option<&str>) -> Result<(), GatewayError> {
        self.calls.push(call);
        if let Some(error) = self.fail_next.take() {
            return Err(error);
        }
        if credential.is_some_and(str::is_empty) {
            return Err(GatewayError::Unauthorized { status: 401 });
        }
        Ok(())
    }
}

/// In-memory stand-in for both remote services with deterministic ids.
pub struct FakeService {
    state: RefCell<FakeState>,
    page_size: usize,
}

impl Default for FakeService {
    fn default() -> Self {
        Self::with_page_size(2)
    }
}

impl FakeService {
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            state: RefCell::new(FakeState::default()),
            page_size,
        }
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.state.borrow().calls.clone()
    }

    pub fn fail_next(&self, error: GatewayError) {
        self.state.borrow_mut().fail_next = Some(error);
    }

    /// Adds a thread whose last activity happened `age` ago.
    pub fn seed_thread(&self, id: &str, topic: &str, age: Duration) {
        self.state.borrow_mut().threads.push(FakeThread {
            summary: ThreadSummary {
                id: id.to_owned(),
                topic: topic.to_owned(),
                last_message_received_on: Some(Utc::now() - age),
                deleted_on: None,
            },
            members: Vec::new(),
            messages: Vec::new(),
        });
    }

    fn pages<T: Clone + 'static>(&self, items: Vec<T>) -> Pages<'static, T> {
        Pages::new(VecPages {
            items,
            page_size: self.page_size.max(1),
        })
    }
}

struct VecPages<T> {
    items: Vec<T>,
    page_size: usize,
}

impl<T: Clone> PageSource<T> for VecPages<T> {
    fn fetch(&self, cursor: Option<&PageCursor>) -> Result<Page<T>, GatewayError> {
        let start = match cursor {
            Some(cursor) => cursor
                .as_str()
                .parse::<usize>()
                .map_err(|_| GatewayError::InvalidData("bad cursor".into()))?,
            None => 0,
        };
        let end = (start + self.page_size).min(self.items.len());
        let next = (end < self.items.len()).then(|| PageCursor::new(end.to_string()));

        Ok(Page {
            items: self.items[start.min(end)..end].to_vec(),
            next,
        })
    }
}

impl IdentityGateway for FakeService {
    fn create_user(&self) -> Result<UserId, GatewayError> {
        let mut state = self.state.borrow_mut();
        state.begin("create_user", None)?;
        Ok(UserId::new(state.next_id("8:acs:user")))
    }

    fn issue_token(
        &self,
        user: &UserId,
        scopes: &[TokenScope],
    ) -> Result<AccessToken, GatewayError> {
        let mut state = self.state.borrow_mut();
        state.begin("issue_token", None)?;
        if scopes.is_empty() {
            return Err(GatewayError::Validation {
                message: "at least one scope is required".into(),
            });
        }

        let token = format!("token-for-{}", user.as_str());
        state.tokens.insert(token.clone(), user.clone());
        Ok(AccessToken {
            token,
            expires_on: Utc::now() + Duration::hours(24),
        })
    }
}

impl ChatGateway for FakeService {
    fn create_thread(
        &self,
        credential: &str,
        topic: &str,
        members: &[ThreadMember],
    ) -> Result<ChatThread, GatewayError> {
        let mut state = self.state.borrow_mut();
        state.begin("create_thread", Some(credential))?;

        let id = state.next_id("19:thread");
        let now = Utc::now();
        state.threads.push(FakeThread {
            summary: ThreadSummary {
                id: id.clone(),
                topic: topic.to_owned(),
                last_message_received_on: Some(now),
                deleted_on: None,
            },
            members: members.to_vec(),
            messages: Vec::new(),
        });

        Ok(ChatThread {
            id,
            topic: topic.to_owned(),
            created_on: Some(now),
        })
    }

    fn add_members(
        &self,
        credential: &str,
        thread: &ThreadRef,
        members: &[ThreadMember],
    ) -> Result<(), GatewayError> {
        let mut state = self.state.borrow_mut();
        state.begin("add_members", Some(credential))?;
        state.thread_mut(thread)?.members.extend_from_slice(members);
        Ok(())
    }

    fn send_message(
        &self,
        credential: &str,
        thread: &ThreadRef,
        message: &OutgoingMessage,
    ) -> Result<String, GatewayError> {
        let mut state = self.state.borrow_mut();
        state.begin("send_message", Some(credential))?;

        let id = state.next_id("msg");
        let sender_id = state
            .tokens
            .get(credential)
            .cloned()
            .unwrap_or_else(|| UserId::new(format!("8:acs:{credential}")));
        let now: DateTime<Utc> = Utc::now();
        let target = state.thread_mut(thread)?;
        target.summary.last_message_received_on = Some(now);
        target.messages.push(ChatMessage {
            id: id.clone(),
            kind: MessageKind::Text,
            sender_id: Some(sender_id),
            sender_display_name: message.sender_display_name.clone(),
            content: message.content.clone(),
            created_on: Some(now),
        });

        Ok(id)
    }

    fn list_messages<'a>(
        &'a self,
        credential: &str,
        thread: &ThreadRef,
    ) -> Pages<'a, ChatMessage> {
        let mut state = self.state.borrow_mut();
        if let Err(error) = state.begin("list_messages", Some(credential)) {
            return Pages::failed(error);
        }
        match state.thread_mut(thread) {
            Ok(target) => self.pages(target.messages.clone()),
            Err(error) => Pages::failed(error),
        }
    }

    fn list_members<'a>(
        &'a self,
        credential: &str,
        thread: &ThreadRef,
    ) -> Pages<'a, ThreadMember> {
        let mut state = self.state.borrow_mut();
        if let Err(error) = state.begin("list_members", Some(credential)) {
            return Pages::failed(error);
        }
        match state.thread_mut(thread) {
            Ok(target) => self.pages(target.members.clone()),
            Err(error) => Pages::failed(error),
        }
    }

    fn list_threads<'a>(
        &'a self,
        credential: &str,
        since: DateTime<Utc>,
    ) -> Pages<'a, ThreadSummary> {
        let mut state = self.state.borrow_mut();
        if let Err(error) = state.begin("list_threads", Some(credential)) {
            return Pages::failed(error);
        }
        let threads = state
            .threads
            .iter()
            .filter(|thread| {
                thread
                    .summary
                    .last_message_received_on
                    .is_some_and(|at| at >= since)
            })
            .map(|thread| thread.summary.clone())
            .collect();
        self.pages(threads)
    }
}
