//! Canned replies chosen by keyword.
//!
//! Rules are checked in table order against the lowercased message and the
//! first rule with a matching trigger wins. When nothing matches, the default
//! reply quotes the original message back to the user.

use tracing::trace;

/// One entry of the reply table.
#[derive(Debug, Clone, Copy)]
pub struct ReplyRule {
    /// Lowercase substrings; any one of them selects the rule.
    pub triggers: &'static [&'static str],
    pub reply: &'static str,
}

impl ReplyRule {
    fn matches(&self, lowered: &str) -> bool {
        self.triggers.iter().any(|trigger| lowered.contains(trigger))
    }
}

const GREETING: &str = "Hello! 👋 I'm GhostChat, your AI assistant. How can I help you today?";

const CAPABILITIES: &str = "I can help you with various tasks! Try asking me about:\n\n\
- **Code examples** - I can write code in multiple languages\n\
- **Explanations** - I can explain concepts clearly\n\
- **Problem solving** - I can help think through challenges\n\
- **General questions** - Ask me anything!\n\n\
What would you like to know?";

const CODE_SAMPLE: &str = "Sure! Here's a simple example:\n\n\
```javascript\n\
function greet(name) {\n  \
return `Hello, ${name}!`;\n\
}\n\n\
console.log(greet('World'));\n\
```\n\n\
This function takes a name and returns a greeting. Would you like to see more examples?";

const FEATURES: &str = "I'm powered by GhostChat Embed, which includes:\n\n\
✨ **Shadow DOM isolation** - No CSS conflicts\n\
🎨 **Tailwind + shadcn styling** - Beautiful, modern UI\n\
📡 **SSE streaming** - Real-time responses\n\
🌍 **i18n support** - Multiple languages & RTL\n\
♿ **Accessibility** - ARIA labels, keyboard navigation\n\
📱 **Responsive** - Works great on mobile\n\n\
Is there something specific you'd like to know?";

/// Reply table in priority order.
pub const RULES: &[ReplyRule] = &[
    ReplyRule {
        triggers: &["hello", "hi"],
        reply: GREETING,
    },
    ReplyRule {
        triggers: &["help"],
        reply: CAPABILITIES,
    },
    ReplyRule {
        triggers: &["code", "example"],
        reply: CODE_SAMPLE,
    },
    ReplyRule {
        triggers: &["features", "what can you do"],
        reply: FEATURES,
    },
];

/// A complete reply, fixed once produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply(String);

impl Reply {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for Reply {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Pick the reply for a user message. Total over all inputs.
pub fn respond(message: &str) -> Reply {
    let lowered = message.to_lowercase();
    let text = match RULES.iter().position(|rule| rule.matches(&lowered)) {
        Some(index) => {
            trace!(rule = index, "Reply rule matched");
            RULES[index].reply.to_string()
        }
        None => {
            trace!("No reply rule matched, using default reply");
            default_reply(message)
        }
    };
    Reply(text)
}

fn default_reply(message: &str) -> String {
    format!(
        "I understand you're asking about \"{message}\". \
         This is a demo server with simulated responses. \
         In a real implementation, this would connect to an AI model like GPT-4, Claude, or an open-source LLM. \
         \n\nTry asking me about 'help', 'code', or 'features' for specific examples!"
    )
}
