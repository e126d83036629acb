//! Function tools offered to the model and their execution.
//!
//! Two tools exist: `create_support_ticket` and `check_ticket_status`.
//! Every outcome, including bad arguments and storage failures, is reported
//! back to the model as a [`ToolResult`] rather than an error.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use supportdesk_types::llm::ToolDefinition;
use supportdesk_types::ticket::{Ticket, TicketPriority};

use crate::ticket::service::TicketService;
use crate::ticket::store::TicketStore;

pub const CREATE_TICKET_TOOL: &str = "create_support_ticket";
pub const CHECK_STATUS_TOOL: &str = "check_ticket_status";

/// The tool catalogue sent with the first completion of every turn.
pub fn tool_definitions() -> Vec<ToolDefinition> {
    let priorities: Vec<String> = TicketPriority::ALL.iter().map(ToString::to_string).collect();

    vec![
        ToolDefinition {
            name: CREATE_TICKET_TOOL.to_string(),
            description: "Create a support ticket for issues requiring follow-up".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "subject": {"type": "string"},
                    "description": {"type": "string"},
                    "priority": {
                        "type": "string",
                        "enum": priorities
                    }
                },
                "required": ["subject", "description", "priority"]
            }),
        },
        ToolDefinition {
            name: CHECK_STATUS_TOOL.to_string(),
            description: "Check ticket status".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "ticket_id": {"type": "string"}
                },
                "required": []
            }),
        },
    ]
}

/// Outcome of a tool call, serialized as the `tool` message content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket: Option<Ticket>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tickets: Option<Vec<Ticket>>,
}

impl ToolResult {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            ticket_id: None,
            ticket: None,
            tickets: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            ..Self::success(message)
        }
    }

    pub fn with_ticket_id(mut self, ticket_id: impl Into<String>) -> Self {
        self.ticket_id = Some(ticket_id.into());
        self
    }

    pub fn with_ticket(mut self, ticket: Ticket) -> Self {
        self.ticket = Some(ticket);
        self
    }

    pub fn with_tickets(mut self, tickets: Vec<Ticket>) -> Self {
        self.tickets = Some(tickets);
        self
    }

    /// JSON form handed back to the model.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self)
            .unwrap_or_else(|_| r#"{"success":false,"message":"unserializable tool result"}"#.to_string())
    }
}

/// A tool result plus the id of any ticket it created.
#[derive(Debug, Clone)]
pub struct ToolExecution {
    pub result: ToolResult,
    pub created_ticket_id: Option<String>,
}

impl From<ToolResult> for ToolExecution {
    fn from(result: ToolResult) -> Self {
        Self {
            result,
            created_ticket_id: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CreateTicketArgs {
    subject: String,
    description: String,
    priority: String,
}

#[derive(Debug, Default, Deserialize)]
struct CheckStatusArgs {
    #[serde(default)]
    ticket_id: Option<String>,
}

/// Executes tool calls against the ticket service.
pub struct ToolDispatcher<S: TicketStore> {
    tickets: Arc<TicketService<S>>,
}

impl<S: TicketStore> Clone for ToolDispatcher<S> {
    fn clone(&self) -> Self {
        Self {
            tickets: Arc::clone(&self.tickets),
        }
    }
}

impl<S: TicketStore> ToolDispatcher<S> {
    pub fn new(tickets: Arc<TicketService<S>>) -> Self {
        Self { tickets }
    }

    /// Run the tool `name` with the model's raw JSON `arguments`.
    #[tracing::instrument(name = "execute_tool", skip(self, arguments), fields(tool = %name, user_id = %user_id))]
    pub async fn execute(
        &self,
        name: &str,
        user_id: &str,
        session_id: &str,
        arguments: &str,
    ) -> ToolExecution {
        match name {
            CREATE_TICKET_TOOL => self.create_ticket(user_id, session_id, arguments).await,
            CHECK_STATUS_TOOL => self.check_status(user_id, arguments).await.into(),
            other => {
                warn!(tool = other, "Model requested an unknown tool");
                ToolResult::failure(format!("Unknown tool: {other}")).into()
            }
        }
    }

    async fn create_ticket(&self, user_id: &str, session_id: &str, arguments: &str) -> ToolExecution {
        let args: CreateTicketArgs = match serde_json::from_str(arguments) {
            Ok(args) => args,
            Err(e) => {
                return ToolResult::failure(format!("Invalid arguments for {CREATE_TICKET_TOOL}: {e}"))
                    .into();
            }
        };

        let priority: TicketPriority = match args.priority.parse() {
            Ok(priority) => priority,
            Err(e) => return ToolResult::failure(e.to_string()).into(),
        };

        match self
            .tickets
            .create_ticket(user_id, session_id, &args.subject, &args.description, priority)
            .await
        {
            Ok(ticket) => {
                let message = format!("Ticket {} created successfully.", ticket.ticket_id);
                ToolExecution {
                    result: ToolResult::success(message).with_ticket_id(&ticket.ticket_id),
                    created_ticket_id: Some(ticket.ticket_id),
                }
            }
            Err(e) => {
                warn!(error = %e, "Ticket creation failed");
                ToolResult::failure(format!("Failed to create ticket: {e}")).into()
            }
        }
    }

    async fn check_status(&self, user_id: &str, arguments: &str) -> ToolResult {
        let args: CheckStatusArgs = if arguments.trim().is_empty() {
            CheckStatusArgs::default()
        } else {
            match serde_json::from_str(arguments) {
                Ok(args) => args,
                Err(e) => {
                    return ToolResult::failure(format!(
                        "Invalid arguments for {CHECK_STATUS_TOOL}: {e}"
                    ));
                }
            }
        };

        match self
            .tickets
            .check_status(user_id, args.ticket_id.as_deref())
            .await
        {
            Ok(result) => {
                info!(success = result.success, "Ticket status checked");
                result
            }
            Err(e) => {
                warn!(error = %e, "Ticket status check failed");
                ToolResult::failure(format!("Failed to check ticket status: {e}"))
            }
        }
    }
}
