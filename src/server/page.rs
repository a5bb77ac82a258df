//! The browser chat page
//!
//! A single self-contained HTML document. The script opens a session on
//! load, renders the log, posts each input line, and ends the session when
//! the page goes away.

use crate::config::ChatConfig;

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{{TITLE}}</title>
<style>
  body { font-family: system-ui, sans-serif; margin: 0; background: #fafafa; color: #222; }
  main { max-width: 46rem; margin: 0 auto; height: 100vh; display: flex; flex-direction: column; }
  h1 { font-size: 1.6rem; padding: 1rem 1rem 0.5rem; margin: 0; }
  #log { flex: 1; overflow-y: auto; padding: 0 1rem; }
  .msg { display: flex; gap: 0.6rem; margin: 0.6rem 0; padding: 0.6rem 0.8rem; border-radius: 0.5rem; white-space: pre-wrap; }
  .msg.user { background: #eef2ff; }
  .msg.assistant { background: #fff; border: 1px solid #eee; }
  .avatar { flex: none; }
  #status { min-height: 1.4rem; padding: 0 1rem; color: #777; font-size: 0.9rem; }
  form { display: flex; gap: 0.5rem; padding: 1rem; }
  input { flex: 1; padding: 0.7rem; border: 1px solid #ccc; border-radius: 0.5rem; font-size: 1rem; }
  button { padding: 0.7rem 1rem; border: 0; border-radius: 0.5rem; background: #ff4b4b; color: #fff; }
  button:disabled, input:disabled { opacity: 0.6; }
</style>
</head>
<body>
<main>
  <h1>{{TITLE}}</h1>
  <div id="log" aria-live="polite"></div>
  <div id="status"></div>
  <form id="composer">
    <input id="input" autocomplete="off" placeholder="{{PLACEHOLDER}}" disabled>
    <button id="send" type="submit" disabled>Send</button>
  </form>
</main>
<script>
(() => {
  const log = document.getElementById("log");
  const status = document.getElementById("status");
  const form = document.getElementById("composer");
  const input = document.getElementById("input");
  const send = document.getElementById("send");
  let sessionId = null;

  function bubble(tag, content) {
    const row = document.createElement("div");
    row.className = "msg " + tag;
    const avatar = document.createElement("span");
    avatar.className = "avatar";
    avatar.textContent = tag === "user" ? "🧑" : "🤖";
    const text = document.createElement("div");
    text.textContent = content;
    row.append(avatar, text);
    log.append(row);
    log.scrollTop = log.scrollHeight;
    return row;
  }

  function render(messages) {
    log.replaceChildren();
    for (const m of messages) bubble(m.tag, m.content);
  }

  function setBusy(busy) {
    input.disabled = busy;
    send.disabled = busy;
    status.textContent = busy ? "Thinking..." : "";
    if (!busy) input.focus();
  }

  async function start() {
    try {
      const res = await fetch("/api/sessions", { method: "POST" });
      if (!res.ok) throw new Error((await res.json()).error);
      const session = await res.json();
      sessionId = session.id;
      render(session.messages);
      setBusy(false);
    } catch (err) {
      status.textContent = "Could not start a session: " + err.message;
    }
  }

  form.addEventListener("submit", async (event) => {
    event.preventDefault();
    const text = input.value;
    if (!text.trim() || !sessionId) return;
    input.value = "";
    // Shown while the reply is pending; the server log replaces it on success.
    const unsent = bubble("user", text);
    let failure = null;
    setBusy(true);
    try {
      const res = await fetch(`/api/sessions/${sessionId}/messages`, {
        method: "POST",
        headers: { "Content-Type": "application/json" },
        body: JSON.stringify({ text }),
      });
      const body = await res.json();
      if (!res.ok) throw new Error(body.error);
      render(body.messages);
    } catch (err) {
      unsent.remove();
      input.value = text;
      failure = err.message;
    } finally {
      setBusy(false);
      if (failure) status.textContent = "⚠️ Not sent: " + failure;
    }
  });

  window.addEventListener("pagehide", () => {
    if (sessionId) {
      fetch(`/api/sessions/${sessionId}`, { method: "DELETE", keepalive: true });
    }
  });

  start();
})();
</script>
</body>
</html>
"#;

/// Render the chat page for the given presentation settings
pub fn render_page(chat: &ChatConfig) -> String {
    PAGE_TEMPLATE
        .replace("{{TITLE}}", &escape_html(&chat.title))
        .replace("{{PLACEHOLDER}}", &escape_html(&chat.input_placeholder))
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
