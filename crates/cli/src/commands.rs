use anyhow::{anyhow, Result};
use postbox_domain::{CreateMessage, ErrorRecord, RequestDescriptor, Session};
use postbox_infra::PostboxContext;
use serde_json::{json, Value};
use tracing::warn;

use crate::cli::{Account, Commands};

pub async fn execute(ctx: &PostboxContext, command: Commands) -> Result<()> {
    match command {
        Commands::Login(Account { email, password }) => {
            let mut reported = None;
            let session = ctx.api.login(&email, &password, |e| reported = Some(e)).await;
            let Some(session) = session else {
                return Err(reported.map_or_else(|| anyhow!("login failed"), failure));
            };
            // Profile fetch failed but the session survived
            if let Some(record) = reported {
                warn!(kind = %record.kind, detail = %record.detail, "login completed with error");
            }
            print(session_json(&session, ctx).await)
        }
        Commands::Logout => {
            let mut reported = None;
            let done = ctx.api.logout(|e| reported = Some(e)).await;
            required(done.then_some(()), reported)?;
            print(json!({ "loggedOut": true }))
        }
        Commands::Whoami => {
            let session = restore(ctx).await?;
            print(session_json(&session, ctx).await)
        }
        Commands::Renew => {
            let mut reported = None;
            let session = ctx.api.renew(|e| reported = Some(e)).await;
            let session = required(session, reported)?;
            print(session_json(&session, ctx).await)
        }
        Commands::Inbox { all, hidden } => {
            restore(ctx).await?;
            let mut reported = None;
            let inbox = ctx.messaging.get_inbox(!all, hidden, |e| reported = Some(e)).await;
            if let Some(record) = reported {
                return Err(failure(record));
            }
            print(serde_json::to_value(inbox)?)
        }
        Commands::Message { id } => {
            restore(ctx).await?;
            let mut reported = None;
            let message = ctx.messaging.get_message_content(&id, |e| reported = Some(e)).await;
            let message = required(message, reported)?;
            let mut value = serde_json::to_value(&message)?;
            if let (Some(text), Some(object)) = (message.text(), value.as_object_mut()) {
                object.insert("text".into(), Value::String(text.to_string()));
            }
            print(value)
        }
        Commands::Send { recipients, text } => {
            restore(ctx).await?;
            let message = CreateMessage::text(text, recipients);
            let mut reported = None;
            let sent = ctx.messaging.send_message(&message, |e| reported = Some(e)).await;
            print(serde_json::to_value(required(sent, reported)?)?)
        }
        Commands::FreeBlocks { endpoint } => {
            restore(ctx).await?;
            let mut reported = None;
            let blocks = ctx.schedule.get_free_blocks(&endpoint, |e| reported = Some(e)).await;
            print(serde_json::to_value(required(blocks, reported)?)?)
        }
        Commands::Forgot(Account { email, password }) => {
            let mut completion = None;
            let mut reported = None;
            ctx.api
                .forgot_password(&email, &password, |m| completion = Some(m), |e| reported = Some(e))
                .await;
            if let Some(record) = reported {
                return Err(failure(record));
            }
            print(json!({ "message": completion.unwrap_or_default() }))
        }
        Commands::Register(Account { email, password }) => {
            let mut completion = None;
            let mut reported = None;
            ctx.api
                .register(&email, &password, |m| completion = Some(m), |e| reported = Some(e))
                .await;
            if let Some(record) = reported {
                return Err(failure(record));
            }
            print(json!({ "response": parse_body(&completion.unwrap_or_default()) }))
        }
        Commands::Request { method, endpoint, body, no_auth } => {
            let mut descriptor = RequestDescriptor::new(method, endpoint);
            if let Some(body) = body {
                descriptor = descriptor.with_body(body);
            }
            if no_auth {
                descriptor = descriptor.unauthenticated();
            } else {
                restore(ctx).await?;
            }

            let mut reported = None;
            let raw = ctx.api.send_raw(&descriptor, |e| reported = Some(e)).await;
            print(parse_body(&required(raw, reported)?))
        }
    }
}

/// The held session, or one restored from the saved credential.
async fn restore(ctx: &PostboxContext) -> Result<Session> {
    let mut reported = None;
    let session = ctx.api.restore(|e| reported = Some(e)).await;
    required(session, reported)
}

async fn session_json(session: &Session, ctx: &PostboxContext) -> Value {
    let profile = ctx.api.user_info().await;
    json!({
        "userId": session.user_id,
        "expires": session.expires.to_rfc3339(),
        "name": profile.as_ref().map(|p| p.name()),
        "profile": profile,
    })
}

fn required<T>(value: Option<T>, reported: Option<ErrorRecord>) -> Result<T> {
    match (value, reported) {
        (Some(value), _) => Ok(value),
        (None, Some(record)) => Err(failure(record)),
        (None, None) => Err(anyhow!("no result returned")),
    }
}

fn failure(record: ErrorRecord) -> anyhow::Error {
    anyhow!("{}: {}", record.kind, record.detail)
}

/// JSON when the body is JSON, otherwise the text as a string.
fn parse_body(body: &str) -> Value {
    if body.is_empty() {
        return Value::Null;
    }
    serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string()))
}

fn print(value: Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_parsing_keeps_text_bodies() {
        assert_eq!(parse_body(""), Value::Null);
        assert_eq!(parse_body(r#"{"ok":true}"#), json!({ "ok": true }));
        assert_eq!(parse_body("Created"), Value::String("Created".into()));
    }

    #[test]
    fn reported_record_becomes_the_error() {
        let err = required::<()>(None, Some(ErrorRecord::new("Not Found", "gone"))).unwrap_err();
        assert_eq!(err.to_string(), "Not Found: gone");
        assert!(required(Some(1), None).is_ok());
    }
}
