use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use agora_authz::{MessageLookup, MessageRef};
use agora_messenger::MessageStore;
use agora_types::{ConversationId, Message};
use anyhow::Result;
use tracing::info;

/// Message bodies on disk: one JSON-lines file per conversation side-record,
/// one message per line. Appends are the only writes; nothing here ever
/// deletes, so side-records removed from the relational store leave their
/// files behind as orphans.
pub struct JsonMessageStore {
    root: PathBuf,
    lock: Mutex<()>,
}

impl JsonMessageStore {
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;

        info!("Message store opened at {}", root.display());
        Ok(Self {
            root,
            lock: Mutex::new(()),
        })
    }

    fn file_for(&self, conversation: ConversationId) -> PathBuf {
        self.root.join(format!("{conversation}.jsonl"))
    }

    // Callers hold the guard; a conversation with no file simply has no
    // messages yet.
    fn read_all(&self, conversation: ConversationId) -> Result<Vec<Message>> {
        let file = match fs::File::open(self.file_for(conversation)) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let mut messages = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = line?;
            if line.is_empty() {
                continue;
            }
            messages.push(serde_json::from_str(&line)?);
        }
        Ok(messages)
    }

    fn guard(&self) -> Result<MutexGuard<'_, ()>> {
        self.lock
            .lock()
            .map_err(|e| anyhow::anyhow!("message store lock poisoned: {e}"))
    }
}

impl MessageStore for JsonMessageStore {
    fn append(&self, message: &Message) -> Result<()> {
        let _guard = self.guard()?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.file_for(message.conversation_id))?;
        let mut line = serde_json::to_string(message)?;
        line.push('\n');
        file.write_all(line.as_bytes())?;
        Ok(())
    }

    fn list(&self, conversation: ConversationId) -> Result<Vec<Message>> {
        let _guard = self.guard()?;
        self.read_all(conversation)
    }

    fn last_text(&self, conversation: ConversationId) -> Result<Option<String>> {
        let _guard = self.guard()?;
        Ok(self.read_all(conversation)?.pop().map(|m| m.text))
    }

    fn find(&self, conversation: ConversationId, message: &str) -> Result<Option<Message>> {
        let _guard = self.guard()?;
        Ok(self
            .read_all(conversation)?
            .into_iter()
            .find(|m| m.id == message))
    }
}

impl MessageLookup for JsonMessageStore {
    fn message_ref(
        &self,
        conversation: ConversationId,
        message: &str,
    ) -> Result<Option<MessageRef>> {
        Ok(MessageStore::find(self, conversation, message)?.map(|m| MessageRef {
            id: m.id,
            conversation_id: m.conversation_id,
        }))
    }
}
