//! Outbound email.
//!
//! Only signup needs mail, so the surface is one message type and a backend
//! trait. [`ConsoleBackend`] writes to the log for development;
//! [`MemoryBackend`] captures messages for tests.

use async_trait::async_trait;
use grappelli_core::Result;
use grappelli_models::User;
use tokio::sync::Mutex;

/// A plain-text email.
#[derive(Debug, Clone, PartialEq)]
pub struct EmailMessage {
	pub to: String,
	pub subject: String,
	pub body: String,
}

impl EmailMessage {
	/// The signup confirmation message for an account.
	pub fn confirmation(user: &User, code: &str) -> Self {
		Self {
			to: user.email.clone(),
			subject: "Your confirmation code".into(),
			body: format!(
				"Hello {},\n\nYour confirmation code is: {}\n",
				user.username, code
			),
		}
	}
}

/// Delivery backend seam.
#[async_trait]
pub trait EmailBackend: Send + Sync {
	async fn send(&self, message: EmailMessage) -> Result<()>;
}

/// Logs messages instead of delivering them.
#[derive(Debug, Default)]
pub struct ConsoleBackend;

#[async_trait]
impl EmailBackend for ConsoleBackend {
	async fn send(&self, message: EmailMessage) -> Result<()> {
		tracing::info!(to = %message.to, subject = %message.subject, "email sent");
		tracing::debug!(body = %message.body, "email body");
		Ok(())
	}
}

/// Collects sent messages in memory.
#[derive(Debug, Default)]
pub struct MemoryBackend {
	outbox: Mutex<Vec<EmailMessage>>,
}

impl MemoryBackend {
	pub fn new() -> Self {
		Self::default()
	}

	pub async fn sent(&self) -> Vec<EmailMessage> {
		self.outbox.lock().await.clone()
	}
}

#[async_trait]
impl EmailBackend for MemoryBackend {
	async fn send(&self, message: EmailMessage) -> Result<()> {
		self.outbox.lock().await.push(message);
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use grappelli_models::Role;

	#[tokio::test]
	async fn test_memory_backend_captures_messages() {
		let backend = MemoryBackend::new();
		let user = User {
			id: 1,
			username: "stephane".into(),
			email: "stephane@example.com".into(),
			role: Role::User,
			is_staff: false,
			first_name: String::new(),
			last_name: String::new(),
			bio: String::new(),
		};

		backend
			.send(EmailMessage::confirmation(&user, "abc123"))
			.await
			.unwrap();

		let sent = backend.sent().await;
		assert_eq!(sent.len(), 1);
		assert_eq!(sent[0].to, "stephane@example.com");
		assert!(sent[0].body.contains("abc123"));
	}
}
