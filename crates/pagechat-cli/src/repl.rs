//! Line-oriented REPL: bare input is a question, `/`-prefixed input is a
//! command. Streamed answers are rendered incrementally from the session
//! store's streaming buffer.

use std::io::Write as _;
use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;
use uuid::Uuid;

use pagechat_core::{Error, Role};

use pagechat_client::{ChatSession, NoticeBus, SharedStore};

const HELP: &str = "\
Commands:
  /docs                 list documents
  /chats                list conversations
  /open <id>            open a conversation
  /new                  start a new conversation
  /upload <path>        upload a document
  /delete-doc <id>      delete a document
  /delete-chat <id>     delete a conversation
  /rename <title>       rename the open conversation
  /export               export the open conversation as markdown
  /quit                 exit
Anything else is asked as a question.";

pub async fn run(session: ChatSession, store: SharedStore, notices: NoticeBus) -> Result<()> {
    println!("pagechat — ask questions about your documents. /help for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(command) = line.strip_prefix('/') {
            if !dispatch(command, &session, &store, &notices).await? {
                break;
            }
        } else {
            ask(&session, &store, line).await;
        }
    }

    Ok(())
}

/// Handle one command line. Returns false when the REPL should exit.
async fn dispatch(
    command: &str,
    session: &ChatSession,
    store: &SharedStore,
    notices: &NoticeBus,
) -> Result<bool> {
    let (name, arg) = match command.split_once(' ') {
        Some((name, arg)) => (name, arg.trim()),
        None => (command, ""),
    };

    match name {
        "help" => println!("{}", HELP),
        "quit" | "exit" => return Ok(false),
        "docs" => {
            let store = store.read().await;
            if store.documents().is_empty() {
                println!("No documents uploaded.");
            }
            for doc in store.documents() {
                println!(
                    "{}  {:<10}  {}  ({} pages)",
                    doc.id,
                    doc.status.to_string(),
                    doc.original_filename,
                    doc.page_count.map_or("?".to_string(), |p| p.to_string()),
                );
            }
        }
        "chats" => {
            let store = store.read().await;
            if store.conversations().is_empty() {
                println!("No conversations yet.");
            }
            for conv in store.conversations() {
                let open = store.current_conversation_id() == Some(conv.id);
                println!(
                    "{} {}  {}",
                    if open { "*" } else { " " },
                    conv.id,
                    conv.title.as_deref().unwrap_or("(untitled)"),
                );
            }
        }
        "open" => match arg.parse::<Uuid>() {
            Ok(id) => {
                session.open_conversation(id).await?;
                let store = store.read().await;
                for msg in store.messages() {
                    let who = match msg.role {
                        Role::User => "you",
                        Role::Assistant => "assistant",
                    };
                    println!("[{}] {}", who, msg.content);
                }
            }
            Err(_) => println!("Usage: /open <conversation-id>"),
        },
        "new" => {
            session.new_conversation().await;
            println!("Started a new conversation.");
        }
        "upload" => {
            if arg.is_empty() {
                println!("Usage: /upload <path>");
            } else if let Err(e) = upload(session, store, notices, arg).await {
                notices.error(e.to_string());
            }
        }
        "delete-doc" => match arg.parse::<Uuid>() {
            Ok(id) => {
                session.delete_document(id).await?;
                println!("Document deleted.");
            }
            Err(_) => println!("Usage: /delete-doc <document-id>"),
        },
        "delete-chat" => match arg.parse::<Uuid>() {
            Ok(id) => {
                session.delete_conversation(id).await?;
                println!("Conversation deleted.");
            }
            Err(_) => println!("Usage: /delete-chat <conversation-id>"),
        },
        "rename" => {
            let current = store.read().await.current_conversation_id();
            match (current, arg.is_empty()) {
                (_, true) => println!("Usage: /rename <title>"),
                (None, _) => println!("No conversation open."),
                (Some(id), false) => {
                    session.rename_conversation(id, arg).await?;
                    println!("Renamed.");
                }
            }
        }
        "export" => {
            let current = store.read().await.current_conversation_id();
            match current {
                None => println!("No conversation open."),
                Some(id) => {
                    let export = session.export_conversation(id).await?;
                    let filename = export_filename(&export.filename);
                    tokio::fs::write(&filename, export.content).await?;
                    println!("Exported to {}", filename);
                }
            }
        }
        other => println!("Unknown command /{} — try /help", other),
    }

    Ok(true)
}

async fn upload(
    session: &ChatSession,
    store: &SharedStore,
    notices: &NoticeBus,
    path: &str,
) -> Result<(), Error> {
    let filename = Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| Error::InvalidInput(format!("bad path: {}", path)))?
        .to_string();

    let bytes = tokio::fs::read(path).await?;
    let response = session.upload(&filename, bytes).await?;
    debug!(document_id = %response.document_id, "Upload acknowledged");

    let count = store.read().await.processing_documents().len();
    notices.success(format!(
        "Uploaded {} — indexing started ({} processing)",
        filename, count
    ));
    Ok(())
}

/// Reduce a server-supplied export filename to its basename so the file
/// always lands in the working directory.
fn export_filename(suggested: &str) -> String {
    Path::new(suggested)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("conversation.md")
        .to_string()
}

/// Ask a question, rendering the streaming buffer incrementally while the
/// session task runs.
async fn ask(session: &ChatSession, store: &SharedStore, question: &str) {
    let task = {
        let session = session.clone();
        let question = question.to_string();
        tokio::spawn(async move { session.send_message(&question).await })
    };

    let mut printed = 0usize;
    loop {
        {
            let store = store.read().await;
            let content = store.streaming_content();
            if content.len() > printed && content.is_char_boundary(printed) {
                print!("{}", &content[printed..]);
                let _ = std::io::stdout().flush();
                printed = content.len();
            }
        }
        if task.is_finished() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    match task.await {
        Ok(Ok(())) => {
            let store = store.read().await;
            if let Some(msg) = store.messages().last() {
                if msg.role == Role::Assistant {
                    // The buffer clears at done; print whatever tail of the
                    // final message the incremental render missed.
                    if msg.content.len() > printed && msg.content.is_char_boundary(printed) {
                        print!("{}", &msg.content[printed..]);
                    }
                    println!();
                    for (i, cite) in msg.citations.iter().flatten().enumerate() {
                        println!("  [{}] {}, page {}", i + 1, cite.filename, cite.page);
                    }
                }
            }
        }
        Ok(Err(e)) => {
            println!();
            eprintln!("error: {}", e);
        }
        Err(e) => {
            println!();
            eprintln!("error: chat task failed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_filename_keeps_plain_name() {
        assert_eq!(
            export_filename("conversation_abcd1234.md"),
            "conversation_abcd1234.md"
        );
    }

    #[test]
    fn test_export_filename_strips_path_components() {
        assert_eq!(export_filename("/etc/passwd"), "passwd");
        assert_eq!(export_filename("../../escape.md"), "escape.md");
    }

    #[test]
    fn test_export_filename_falls_back_on_bare_traversal() {
        assert_eq!(export_filename(".."), "conversation.md");
        assert_eq!(export_filename(""), "conversation.md");
    }
}
