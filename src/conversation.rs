use std::io::{BufRead, Write};

use termimad::MadSkin;
use tracing::{debug, info, instrument, warn};

use crate::client::AssistantApi;
use crate::config::Config;
use crate::error::{ChatError, Result};
use crate::types::{
    ChatCompletionRequest, ChatMessage, MessageRequest, Role, Thread, ThreadMessage, ThreadRequest,
};

pub const INITIAL_PROMPT: &str = "Enter a question: ";
pub const FOLLOW_UP_PROMPT: &str = "\nEnter a follow-up question (or type 'exit' to quit): ";
pub const EXIT_KEYWORD: &str = "exit";

/// True when the line, trimmed and case-folded, is the exit keyword.
pub fn is_exit_command(line: &str) -> bool {
    line.trim().to_lowercase() == EXIT_KEYWORD
}

/// Creates a chatbot thread whose first message is `initial_message`.
#[instrument(skip_all)]
pub async fn create_thread_with_message<A: AssistantApi>(
    api: &A,
    initial_message: &str,
) -> Result<Thread> {
    let thread = api
        .create_thread(&ThreadRequest::chatbot(initial_message.to_string()))
        .await?;
    info!(thread_id = %thread.id, "thread created");
    Ok(thread)
}

#[instrument(skip(api, content))]
pub async fn add_user_message_to_thread<A: AssistantApi>(
    api: &A,
    thread_id: &str,
    role: Role,
    content: &str,
) -> Result<()> {
    api.create_message(thread_id, &MessageRequest::new(role, content.to_string()))
        .await?;
    debug!(chars = content.len(), "message appended");
    Ok(())
}

#[instrument(skip(api, response))]
pub async fn save_assistant_response_to_thread<A: AssistantApi>(
    api: &A,
    thread_id: &str,
    response: &str,
) -> Result<()> {
    api.create_message(
        thread_id,
        &MessageRequest::new(Role::Assistant, response.to_string()),
    )
    .await?;
    debug!(chars = response.len(), "assistant response saved");
    Ok(())
}

/// Every message in the thread, oldest first. The service pages newest
/// first, so pages are collected by cursor and reversed once at the end.
pub async fn fetch_thread_history<A: AssistantApi>(
    api: &A,
    thread_id: &str,
) -> Result<Vec<ThreadMessage>> {
    let mut messages = Vec::new();
    let mut cursor: Option<String> = None;
    loop {
        let page = api.list_messages(thread_id, cursor.as_deref()).await?;
        let has_more = page.has_more;
        let last_id = page.last_id.clone().or_else(|| page.data.last().map(|m| m.id.clone()));
        messages.extend(page.data);
        match last_id {
            Some(id) if has_more => cursor = Some(id),
            _ => break,
        }
    }
    messages.reverse();
    Ok(messages)
}

/// Replays the whole thread through a chat completion and returns the text
/// of the first choice. A refusal counts as the reply; a choice with no text
/// at all is an error, so nothing blank is ever printed or saved.
#[instrument(skip(api), fields(messages = tracing::field::Empty))]
pub async fn get_assistant_response_via_chat_completion<A: AssistantApi>(
    api: &A,
    thread_id: &str,
    model: &str,
) -> Result<String> {
    let history = fetch_thread_history(api, thread_id).await?;

    let mut request = ChatCompletionRequest::new(model.to_string());
    for message in history {
        match message.text() {
            Some(text) => request.messages.push(ChatMessage::new(message.role, text)),
            None => warn!(message_id = %message.id, "skipping message without text content"),
        }
    }
    tracing::Span::current().record("messages", request.messages.len());

    let response = api.create_chat_completion(&request).await?;
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or(ChatError::EmptyCompletion)?;
    choice.message.into_reply().ok_or(ChatError::BlankCompletion)
}

/// Writes the thread's messages, oldest first, framed by a header and footer.
pub async fn print_thread_history<A: AssistantApi, W: Write>(
    api: &A,
    thread_id: &str,
    out: &mut W,
) -> Result<()> {
    let history = fetch_thread_history(api, thread_id).await?;
    writeln!(out, "\n--- Full Thread History ---")?;
    for message in &history {
        writeln!(out, "{}: {}", message.role, message.text().unwrap_or_default())?;
    }
    writeln!(out, "----------------------------")?;
    Ok(())
}

/// The interactive loop: one thread per session, one completion per turn.
pub struct ChatSession<'a, A, R, W> {
    api: &'a A,
    model: String,
    show_history: bool,
    skin: Option<MadSkin>,
    input: R,
    output: W,
}

impl<'a, A, R, W> ChatSession<'a, A, R, W>
where
    A: AssistantApi,
    R: BufRead,
    W: Write,
{
    pub fn new(api: &'a A, config: &Config, input: R, output: W) -> Self {
        Self {
            api,
            model: config.model.clone(),
            show_history: config.show_history,
            skin: config.render_markdown.then(MadSkin::default),
            input,
            output,
        }
    }

    /// Runs until the exit keyword or end of input. Any remote failure ends
    /// the session with that error.
    pub async fn run(&mut self) -> Result<()> {
        let Some(question) = self.prompt(INITIAL_PROMPT)? else {
            return Ok(());
        };
        if is_exit_command(&question) {
            return Ok(());
        }

        let thread = create_thread_with_message(self.api, &question).await?;
        writeln!(self.output, "Created thread with ID: {}", thread.id)?;
        self.respond(&thread.id).await?;

        loop {
            let Some(question) = self.prompt(FOLLOW_UP_PROMPT)? else {
                break;
            };
            if is_exit_command(&question) {
                break;
            }
            add_user_message_to_thread(self.api, &thread.id, Role::User, &question).await?;
            self.respond(&thread.id).await?;
        }

        info!(thread_id = %thread.id, "conversation finished");
        Ok(())
    }

    async fn respond(&mut self, thread_id: &str) -> Result<()> {
        let reply =
            get_assistant_response_via_chat_completion(self.api, thread_id, &self.model).await?;
        // markdown styling is display-only; the thread keeps the raw reply
        match &self.skin {
            Some(skin) => {
                writeln!(self.output, "Assistant Response:\n{}", skin.text(&reply, None))?
            }
            None => writeln!(self.output, "Assistant Response:\n{}", reply)?,
        }
        save_assistant_response_to_thread(self.api, thread_id, &reply).await?;

        if self.show_history {
            print_thread_history(self.api, thread_id, &mut self.output).await?;
        }
        Ok(())
    }

    /// Prompts until a non-blank line arrives. `None` means end of input.
    fn prompt(&mut self, prompt: &str) -> Result<Option<String>> {
        loop {
            write!(self.output, "{}", prompt)?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            let line = line.trim();
            if !line.is_empty() {
                return Ok(Some(line.to_string()));
            }
        }
    }
}
