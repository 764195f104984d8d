//! Tool-loop conversations against a chat completions endpoint.
//!
//! One [`Agent::chat`] call runs the whole exchange: the model either answers
//! in plain text (done) or requests tool calls, in which case every call is
//! executed, its result appended to the transcript as a `tool` message, and
//! the transcript resent. The loop is bounded by a round cap.
//!
//! The endpoint sits behind [`ChatTransport`] so tests can script the model's
//! side of the exchange.
//!
//! # Example
//!
//! ```rust,ignore
//! let response = client
//!     .agent("gpt-4o")
//!     .instructions("You are a travel assistant")
//!     .tool(FindFlights)
//!     .build()
//!     .chat("Get me to Lisbon on Friday")
//!     .await?;
//! ```

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::tool::{ErasedTool, Tool, ToolCall};
use crate::{LlmClient, LlmError, Result};

/// The wire to the completions endpoint, as the tool loop sees it.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Post one request body, return the decoded response body.
    async fn send(&self, body: &Value) -> Result<Value>;
}

#[async_trait]
impl ChatTransport for LlmClient {
    async fn send(&self, body: &Value) -> Result<Value> {
        self.raw_chat(body).await
    }
}

/// Builder for an [`Agent`].
pub struct AgentBuilder<'a> {
    transport: &'a dyn ChatTransport,
    model: String,
    instructions: Option<String>,
    tools: Vec<Box<dyn ErasedTool>>,
    max_rounds: usize,
    temperature: Option<f32>,
}

impl<'a> AgentBuilder<'a> {
    pub(crate) fn new(transport: &'a dyn ChatTransport, model: impl Into<String>) -> Self {
        Self {
            transport,
            model: model.into(),
            instructions: None,
            tools: Vec::new(),
            max_rounds: 10,
            temperature: None,
        }
    }

    /// Set the system instructions for the conversation.
    pub fn instructions(mut self, text: impl Into<String>) -> Self {
        self.instructions = Some(text.into());
        self
    }

    /// Register a tool the model may call.
    pub fn tool<T: Tool + 'static>(mut self, tool: T) -> Self {
        self.tools.push(Box::new(tool));
        self
    }

    /// Cap on model round trips per chat (default 10).
    pub fn max_rounds(mut self, rounds: usize) -> Self {
        self.max_rounds = rounds;
        self
    }

    /// Set the sampling temperature.
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn build(self) -> Agent<'a> {
        Agent {
            transport: self.transport,
            model: self.model,
            instructions: self.instructions,
            tools: self.tools,
            max_rounds: self.max_rounds,
            temperature: self.temperature,
        }
    }
}

/// A conversation driver that lets the model call registered tools.
pub struct Agent<'a> {
    transport: &'a dyn ChatTransport,
    model: String,
    instructions: Option<String>,
    tools: Vec<Box<dyn ErasedTool>>,
    max_rounds: usize,
    temperature: Option<f32>,
}

/// Outcome of one [`Agent::chat`] exchange.
#[derive(Debug)]
pub struct AgentResponse {
    /// The model's final plain-text reply.
    pub content: String,

    /// Names of the tools executed, in call order.
    pub tools_used: Vec<String>,

    /// Model round trips spent, including the final one.
    pub rounds: usize,
}

impl<'a> Agent<'a> {
    /// Send a message and drive the exchange until the model replies in
    /// plain text or the round cap is hit.
    pub async fn chat(&self, user_message: impl Into<String>) -> Result<AgentResponse> {
        let mut transcript: Vec<Value> = Vec::new();
        if let Some(ref instructions) = self.instructions {
            transcript.push(json!({ "role": "system", "content": instructions }));
        }
        transcript.push(json!({ "role": "user", "content": user_message.into() }));

        let mut tools_used = Vec::new();

        for round in 1..=self.max_rounds {
            debug!(
                round,
                model = %self.model,
                transcript_len = transcript.len(),
                "Requesting completion"
            );

            let reply = self.transport.send(&self.request_body(&transcript)).await?;
            let message = first_choice_message(&reply)?;

            let calls = requested_tool_calls(&message);
            if calls.is_empty() {
                let content = message
                    .get("content")
                    .and_then(Value::as_str)
                    .unwrap_or("")
                    .to_string();

                info!(
                    rounds = round,
                    tools = tools_used.len(),
                    "Conversation settled"
                );
                return Ok(AgentResponse {
                    content,
                    tools_used,
                    rounds: round,
                });
            }

            // The assistant turn carrying tool_calls goes back verbatim;
            // each result follows as a `tool` message keyed by the call id.
            transcript.push(message);
            for call in calls {
                info!(tool = %call.name, id = %call.id, "Running tool call");
                tools_used.push(call.name.clone());

                let outcome = self.run_tool(&call).await;
                transcript.push(json!({
                    "role": "tool",
                    "tool_call_id": call.id,
                    "content": outcome,
                }));
            }
        }

        warn!(max_rounds = self.max_rounds, "Tool loop did not settle");
        Err(LlmError::Api(format!(
            "tool loop still unsettled after {} rounds",
            self.max_rounds
        )))
    }

    fn request_body(&self, transcript: &[Value]) -> Value {
        let mut body = json!({
            "model": self.model,
            "messages": transcript,
        });
        if !self.tools.is_empty() {
            body["tools"] = self
                .tools
                .iter()
                .map(|t| t.definition().into_wire())
                .collect();
            body["tool_choice"] = json!("auto");
        }
        if let Some(temperature) = self.temperature {
            body["temperature"] = json!(temperature);
        }
        body
    }

    /// Run one requested call, folding every failure into a string the model
    /// can respond to in conversation.
    async fn run_tool(&self, call: &ToolCall) -> String {
        let Some(tool) = self.tools.iter().find(|t| t.name() == call.name) else {
            warn!(tool = %call.name, "Model requested an unregistered tool");
            return format!("Error: no tool named '{}' is available", call.name);
        };

        match tool.call_erased(&call.arguments).await {
            Ok(output) => output,
            Err(e) => {
                warn!(tool = %call.name, error = %e, "Tool call failed");
                format!("Error: {e}")
            }
        }
    }
}

fn first_choice_message(reply: &Value) -> Result<Value> {
    reply
        .pointer("/choices/0/message")
        .cloned()
        .ok_or_else(|| LlmError::Parse("response has no choices[0].message".into()))
}

fn requested_tool_calls(message: &Value) -> Vec<ToolCall> {
    let Some(values) = message.get("tool_calls").and_then(Value::as_array) else {
        return Vec::new();
    };

    values
        .iter()
        .filter_map(|value| {
            let call = ToolCall::from_value(value);
            if call.is_none() {
                warn!("Discarding malformed tool call: {value}");
            }
            call
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use schemars::JsonSchema;
    use serde::{Deserialize, Serialize};
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    /// Scripted model side of the exchange: returns canned responses in
    /// order and records every request body it was sent.
    struct ScriptedModel {
        script: Mutex<VecDeque<Value>>,
        requests: Mutex<Vec<Value>>,
    }

    impl ScriptedModel {
        fn new(script: Vec<Value>) -> Self {
            Self {
                script: Mutex::new(script.into()),
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ChatTransport for ScriptedModel {
        async fn send(&self, body: &Value) -> Result<Value> {
            self.requests.lock().unwrap().push(body.clone());
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| LlmError::Api("script exhausted".into()))
        }
    }

    fn tool_call_reply(id: &str, name: &str, arguments: &str) -> Value {
        json!({
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": id,
                        "type": "function",
                        "function": { "name": name, "arguments": arguments }
                    }]
                }
            }]
        })
    }

    fn plain_reply(text: &str) -> Value {
        json!({ "choices": [{ "message": { "role": "assistant", "content": text } }] })
    }

    #[derive(Deserialize, JsonSchema)]
    struct RememberArgs {
        preference: String,
    }

    #[derive(Serialize)]
    struct RememberOutput {
        status: String,
    }

    struct RememberPreference {
        saved: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl Tool for RememberPreference {
        const NAME: &'static str = "save_user_preference";
        type Args = RememberArgs;
        type Output = RememberOutput;
        type Error = std::convert::Infallible;

        fn description(&self) -> &str {
            "Remember a travel preference for the user"
        }

        async fn call(&self, args: Self::Args) -> std::result::Result<Self::Output, Self::Error> {
            self.saved.lock().unwrap().push(args.preference);
            Ok(RememberOutput {
                status: "saved".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn tool_round_trip_feeds_the_result_back() {
        let model = ScriptedModel::new(vec![
            tool_call_reply(
                "call_pref1",
                "save_user_preference",
                r#"{"preference": "window seat"}"#,
            ),
            plain_reply("Noted, you prefer a window seat."),
        ]);
        let saved = Arc::new(Mutex::new(Vec::new()));

        let agent = AgentBuilder::new(&model, "test-model")
            .instructions("You are a travel assistant")
            .tool(RememberPreference {
                saved: saved.clone(),
            })
            .build();

        let response = agent.chat("I like window seats").await.unwrap();

        assert_eq!(response.content, "Noted, you prefer a window seat.");
        assert_eq!(response.rounds, 2);
        assert_eq!(response.tools_used, vec!["save_user_preference"]);
        assert_eq!(*saved.lock().unwrap(), vec!["window seat"]);

        // The second request must carry the echoed assistant turn followed
        // by the tool result keyed by the call id.
        let requests = model.requests.lock().unwrap();
        assert_eq!(requests.len(), 2);
        let messages = requests[1]["messages"].as_array().unwrap();

        let assistant = &messages[messages.len() - 2];
        assert_eq!(assistant["tool_calls"][0]["id"], "call_pref1");

        let tool_msg = &messages[messages.len() - 1];
        assert_eq!(tool_msg["role"], "tool");
        assert_eq!(tool_msg["tool_call_id"], "call_pref1");
        let outcome: Value =
            serde_json::from_str(tool_msg["content"].as_str().unwrap()).unwrap();
        assert_eq!(outcome["status"], "saved");
    }

    #[tokio::test]
    async fn unsettled_loop_stops_at_the_round_cap() {
        let model = ScriptedModel::new(vec![
            tool_call_reply("c1", "save_user_preference", r#"{"preference": "aisle"}"#),
            tool_call_reply("c2", "save_user_preference", r#"{"preference": "KLM"}"#),
            tool_call_reply("c3", "save_user_preference", r#"{"preference": "vegan"}"#),
        ]);

        let agent = AgentBuilder::new(&model, "test-model")
            .tool(RememberPreference {
                saved: Arc::new(Mutex::new(Vec::new())),
            })
            .max_rounds(2)
            .build();

        let err = agent.chat("remember everything").await.unwrap_err();

        assert!(err.to_string().contains("2 rounds"));
        assert_eq!(model.requests.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn unregistered_tool_becomes_an_error_message_for_the_model() {
        let model = ScriptedModel::new(vec![
            tool_call_reply("c1", "book_hotel", "{}"),
            plain_reply("I can't book hotels."),
        ]);

        let agent = AgentBuilder::new(&model, "test-model")
            .tool(RememberPreference {
                saved: Arc::new(Mutex::new(Vec::new())),
            })
            .build();

        let response = agent.chat("book me a hotel").await.unwrap();

        assert_eq!(response.content, "I can't book hotels.");
        let requests = model.requests.lock().unwrap();
        let messages = requests[1]["messages"].as_array().unwrap();
        let tool_msg = messages.last().unwrap();
        assert!(tool_msg["content"]
            .as_str()
            .unwrap()
            .contains("no tool named 'book_hotel'"));
    }

    #[test]
    fn builder_registers_tools_and_round_cap() {
        let client = LlmClient::new("test-key");
        let agent = client
            .agent("test-model")
            .instructions("You are a travel assistant")
            .tool(RememberPreference {
                saved: Arc::new(Mutex::new(Vec::new())),
            })
            .max_rounds(4)
            .temperature(0.2)
            .build();

        assert_eq!(agent.tools.len(), 1);
        assert_eq!(agent.tools[0].name(), "save_user_preference");
        assert_eq!(agent.max_rounds, 4);
    }
}
