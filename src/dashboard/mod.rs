//! Client-side state of the owner's dashboard.
//!
//! [`Dashboard`] mirrors what the browser page holds for the length of a
//! visit: the shareable profile link, the accept-messages switch and the
//! received messages. Every action is one request through [`ApiClient`];
//! outcomes are reported as [`Notice`]s rather than errors.

mod client;
mod notice;

use tracing::{debug, warn};

pub use client::{ApiClient, ClientError};
pub use notice::{Notice, NoticeVariant};

use crate::{db::Message, session::SessionUser};

const FALLBACK_MESSAGE: &str = "Something went wrong";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardStatus {
    Unauthenticated,
    Loading,
    Loaded,
}

pub struct Dashboard {
    client: ApiClient,
    status: DashboardStatus,
    user: Option<SessionUser>,
    profile_url: Option<String>,
    accept_messages: bool,
    messages: Vec<Message>,
    notices: Vec<Notice>,
}

impl Dashboard {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            status: DashboardStatus::Unauthenticated,
            user: None,
            profile_url: None,
            accept_messages: false,
            messages: Vec::new(),
            notices: Vec::new(),
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn status(&self) -> DashboardStatus {
        self.status
    }

    pub fn user(&self) -> Option<&SessionUser> {
        self.user.as_ref()
    }

    pub fn profile_url(&self) -> Option<&str> {
        self.profile_url.as_deref()
    }

    pub fn accept_messages(&self) -> bool {
        self.accept_messages
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    fn notify(&mut self, notice: Notice) {
        debug!(text = notice.text(), variant = ?notice.variant, "notice");
        self.notices.push(notice);
    }

    /// Loads everything the page shows. Does nothing beyond resolving the
    /// session when nobody is signed in.
    pub async fn mount(&mut self) {
        let user = match self.client.session().await {
            Ok(user) => user,
            Err(e) => {
                warn!(error = %e, "could not resolve session");
                self.notify(
                    Notice::titled("Failed to load session")
                        .with_description(describe(&e))
                        .destructive(),
                );
                None
            }
        };

        let Some(user) = user else {
            self.user = None;
            self.status = DashboardStatus::Unauthenticated;
            return;
        };

        self.status = DashboardStatus::Loading;
        self.profile_url = self.client.profile_url(&user.username).ok().map(String::from);
        self.user = Some(user);

        match self.client.accept_messages().await {
            Ok(accepting) => self.accept_messages = accepting,
            Err(e) => self.notify(
                Notice::titled("Failed to fetch user message status")
                    .with_description(describe(&e))
                    .destructive(),
            ),
        }

        self.fetch_messages().await;
    }

    /// Manual refresh of the message list.
    pub async fn fetch_messages(&mut self) {
        if !self.is_authenticated() {
            return;
        }

        self.status = DashboardStatus::Loading;
        match self.client.messages().await {
            Ok(None) => {
                self.messages.clear();
                self.notify(Notice::titled("No message yet"));
            }
            Ok(Some(messages)) => {
                self.messages = messages;
                self.notify(Notice::described("Message fetched successfully"));
            }
            Err(e) => self.notify(Notice::described(describe(&e)).destructive()),
        }
        self.status = DashboardStatus::Loaded;
    }

    /// Asks the server to flip the switch. The local flag follows the value
    /// the server confirms and stays put when the request fails.
    pub async fn toggle_accept_messages(&mut self) -> bool {
        if !self.is_authenticated() {
            return false;
        }

        let requested = !self.accept_messages;
        match self.client.set_accept_messages(requested).await {
            Ok(reply) => {
                self.accept_messages =
                    reply.data.map_or(requested, |data| data.user_accepting_message);
                if let Some(user) = self.user.as_mut() {
                    user.is_accepting_messages = self.accept_messages;
                }
                self.notify(Notice::described(reply.message));
                true
            }
            Err(e) => {
                self.notify(Notice::titled(describe(&e)).destructive());
                false
            }
        }
    }

    /// Deletes the message shown at `index`; the list is updated locally.
    pub async fn delete_message(&mut self, index: usize) -> bool {
        let Some(message_id) = self.messages.get(index).map(|m| m.id.clone()) else {
            self.notify(Notice::described("Message not found").destructive());
            return false;
        };

        match self.client.delete_message(&message_id).await {
            Ok(_) => {
                self.messages.retain(|m| m.id != message_id);
                true
            }
            Err(e) => {
                self.notify(Notice::described(describe(&e)).destructive());
                false
            }
        }
    }

    /// Clipboard access belongs to the front end; this hands over the link.
    pub fn copy_profile_url(&mut self) -> Option<String> {
        let url = self.profile_url.clone()?;
        self.notify(
            Notice::titled("URL Copied!")
                .with_description("Profile URL has been copied to clipboard."),
        );
        Some(url)
    }
}

fn describe(e: &ClientError) -> String {
    e.server_message().unwrap_or(FALLBACK_MESSAGE).to_owned()
}
