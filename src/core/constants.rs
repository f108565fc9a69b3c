//! Shared constants used across the application

use std::time::Duration;

/// Backend address used when neither the config file nor the environment
/// supplies one.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Environment variable that overrides the configured backend address.
pub const BASE_URL_ENV: &str = "WAYFARER_API_URL";

/// User identifier sent with chat submissions when none is configured.
pub const DEFAULT_USER_ID: &str = "user123";

/// Interval between provider status refreshes while a tracker is polling.
pub const DEFAULT_PROVIDER_REFRESH: Duration = Duration::from_secs(30);

/// Agent that authors the session's opening message.
pub const ORCHESTRATOR_AGENT_ID: &str = "orchestrator";

/// Persona shown for agent messages whose author is unknown.
pub const DEFAULT_PERSONA_NAME: &str = "Assistant";
pub const DEFAULT_PERSONA_COLOR: &str = "#2563EB";

pub const WELCOME_MESSAGE_ID: &str = "welcome";
pub const DIAGNOSTIC_MESSAGE_ID: &str = "diagnostic";

pub const WELCOME_MESSAGE: &str = "\
🤖 **Welcome to your AI Travel Assistant!**

I'm powered by **Multi-LLM Technology** with automatic fallback support:

🧠 **Available LLMs**: OpenAI, Anthropic, Google, Cohere
🔄 **Auto-Fallback**: If one fails, I switch to another
🎯 **Specialized Agents**: Each optimized for different tasks

• 🗺️ Trip Planning - Detailed itineraries
• 📅 Bookings - Hotels, flights, reservations
• 💡 Recommendations - Personalized suggestions
• 🌤️ Seasonal Advice - Best travel timing
• 🏷️ Deals & Offers - Money-saving tips

What would you like to explore today?";

pub const BACKEND_DIAGNOSTIC_MESSAGE: &str = "\
⚠️ **Connection Issue**

I'm having trouble reaching the assistant backend. Please:

**1. Start the API server**
• cd API && python run.py

**2. Check the provider API keys in API/.env**
• OPENAI_API_KEY, ANTHROPIC_API_KEY, GOOGLE_API_KEY, COHERE_API_KEY

**3. Point wayfarer at the right address**
• wayfarer set base-url http://localhost:8000";

pub const SEND_FAILURE_MESSAGE: &str = "\
❌ **Error Processing Request**

I couldn't get a reply for that message. The backend automatically falls back across language-model providers:

**Auto-Fallback Active**
• OpenAI → Anthropic → Google → Cohere

**Possible Issues**
• All provider API keys invalid or expired
• Network connectivity problems
• Rate limits exceeded

Please try again in a moment.";
