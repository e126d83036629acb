//! Wire types for the OpenAI chat completions API.

use serde::{Deserialize, Serialize};

use supportdesk_types::llm::{
    CompletionRequest, Message, MessageRole, ToolCall, ToolChoice, ToolDefinition,
};

#[derive(Debug, Serialize)]
pub struct ChatCompletionBody {
    pub model: String,
    pub messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<WireTool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<ToolChoice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

impl ChatCompletionBody {
    /// Build the request body; `default_model` fills an empty `request.model`.
    pub fn from_request(request: &CompletionRequest, default_model: &str) -> Self {
        let model = if request.model.is_empty() {
            default_model.to_string()
        } else {
            request.model.clone()
        };

        let mut messages = Vec::with_capacity(request.messages.len() + 1);
        if let Some(system) = &request.system {
            messages.push(WireMessage::from(&Message::system(system.clone())));
        }
        messages.extend(request.messages.iter().map(WireMessage::from));

        let tools: Vec<WireTool> = request.tools.iter().map(WireTool::from).collect();
        // tool_choice without tools is rejected by the API.
        let tool_choice = if tools.is_empty() {
            None
        } else {
            request.tool_choice
        };

        Self {
            model,
            messages,
            tools,
            tool_choice,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct WireMessage {
    pub role: MessageRole,
    /// `null` for assistant turns that only carry tool calls.
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<WireToolCall>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl From<&Message> for WireMessage {
    fn from(message: &Message) -> Self {
        let content = if message.role == MessageRole::Assistant
            && !message.tool_calls.is_empty()
            && message.content.is_empty()
        {
            None
        } else {
            Some(message.content.clone())
        };

        Self {
            role: message.role,
            content,
            tool_calls: message.tool_calls.iter().map(WireToolCall::from).collect(),
            tool_call_id: message.tool_call_id.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WireToolCall {
    pub id: String,
    #[serde(rename = "type", default = "function_kind")]
    pub kind: String,
    pub function: WireFunctionCall,
}

fn function_kind() -> String {
    "function".to_string()
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WireFunctionCall {
    pub name: String,
    #[serde(default)]
    pub arguments: String,
}

impl From<&ToolCall> for WireToolCall {
    fn from(call: &ToolCall) -> Self {
        Self {
            id: call.id.clone(),
            kind: function_kind(),
            function: WireFunctionCall {
                name: call.name.clone(),
                arguments: call.arguments.clone(),
            },
        }
    }
}

impl From<WireToolCall> for ToolCall {
    fn from(call: WireToolCall) -> Self {
        Self {
            id: call.id,
            name: call.function.name,
            arguments: call.function.arguments,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct WireTool {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub function: WireFunctionDefinition,
}

#[derive(Debug, Serialize)]
pub struct WireFunctionDefinition {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

impl From<&ToolDefinition> for WireTool {
    fn from(tool: &ToolDefinition) -> Self {
        Self {
            kind: "function",
            function: WireFunctionDefinition {
                name: tool.name.clone(),
                description: tool.description.clone(),
                parameters: tool.parameters.clone(),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponseBody {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub choices: Vec<WireChoice>,
    #[serde(default)]
    pub usage: Option<WireUsage>,
}

#[derive(Debug, Deserialize)]
pub struct WireChoice {
    pub message: WireChoiceMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WireChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub tool_calls: Option<Vec<WireToolCall>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct WireUsage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tool() -> ToolDefinition {
        ToolDefinition {
            name: "check_ticket_status".to_string(),
            description: "Check ticket status".to_string(),
            parameters: json!({"type": "object", "properties": {}}),
        }
    }

    #[test]
    fn test_body_puts_system_first_and_fills_model() {
        let request = CompletionRequest::new("", Some("Be helpful".to_string()), vec![Message::user("Hi")])
            .with_tools(vec![tool()], ToolChoice::Auto);
        let body = serde_json::to_value(ChatCompletionBody::from_request(&request, "n/a")).unwrap();

        assert_eq!(body["model"], "n/a");
        assert_eq!(body["messages"][0], json!({"role": "system", "content": "Be helpful"}));
        assert_eq!(body["messages"][1], json!({"role": "user", "content": "Hi"}));
        assert_eq!(body["tool_choice"], "auto");
        assert_eq!(body["tools"][0]["type"], "function");
        assert_eq!(body["tools"][0]["function"]["name"], "check_ticket_status");
        assert!(body.get("max_tokens").is_none());
    }

    #[test]
    fn test_body_serializes_tool_round_trip_messages() {
        let call = ToolCall {
            id: "call_1".to_string(),
            name: "check_ticket_status".to_string(),
            arguments: "{}".to_string(),
        };
        let request = CompletionRequest::new(
            "agent-model",
            None,
            vec![
                Message::user("Status?"),
                Message::assistant_with_tools("", vec![call]),
                Message::tool_result("call_1", r#"{"success":true}"#),
            ],
        );
        let body = serde_json::to_value(ChatCompletionBody::from_request(&request, "n/a")).unwrap();

        assert_eq!(body["model"], "agent-model");
        assert!(body.get("tools").is_none());
        assert!(body.get("tool_choice").is_none());
        let assistant = &body["messages"][1];
        assert_eq!(assistant["content"], serde_json::Value::Null);
        assert_eq!(
            assistant["tool_calls"][0],
            json!({"id": "call_1", "type": "function", "function": {"name": "check_ticket_status", "arguments": "{}"}})
        );
        let tool_message = &body["messages"][2];
        assert_eq!(tool_message["role"], "tool");
        assert_eq!(tool_message["tool_call_id"], "call_1");
    }

    #[test]
    fn test_parse_response_with_tool_calls() {
        let raw = json!({
            "id": "chatcmpl-1",
            "model": "agent",
            "choices": [{
                "message": {
                    "content": null,
                    "tool_calls": [{
                        "id": "call_9",
                        "type": "function",
                        "function": {"name": "create_support_ticket", "arguments": "{\"subject\":\"x\"}"}
                    }]
                },
                "finish_reason": "tool_calls"
            }],
            "usage": {"prompt_tokens": 12, "completion_tokens": 3, "total_tokens": 15}
        });
        let body: ChatCompletionResponseBody = serde_json::from_value(raw).unwrap();
        let choice = &body.choices[0];
        assert!(choice.message.content.is_none());
        assert_eq!(choice.finish_reason.as_deref(), Some("tool_calls"));
        let usage = body.usage.unwrap();
        assert_eq!((usage.prompt_tokens, usage.completion_tokens), (12, 3));
    }
}
