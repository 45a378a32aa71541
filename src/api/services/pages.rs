//! Minimal HTML pages for render outcomes

use crate::services::dispatcher::Render;
use crate::utils::escape_html;

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <meta name=\"robots\" content=\"noindex\">\n<title>{}</title>\n</head>\n\
         <body>\n{}\n</body>\n</html>\n",
        escape_html(title),
        body
    )
}

pub fn blocked_page(reason: &str) -> String {
    page(
        "Access blocked",
        &format!(
            "<h1>Access blocked</h1>\n<p>{}</p>",
            escape_html(reason)
        ),
    )
}

pub fn message_page(text: &str) -> String {
    page("Message", &format!("<p>{}</p>", escape_html(text)))
}

/// Rule-supplied markup is served as is.
pub fn landing_page(html: &str) -> String {
    page("Welcome", html)
}

/// The form posts back to the link it gates.
pub fn challenge_page(code: &str, challenge_id: &str, prompt: &str, error: Option<&str>) -> String {
    let error = error
        .map(|e| format!("<p role=\"alert\">{}</p>\n", escape_html(e)))
        .unwrap_or_default();
    page(
        "Quick check",
        &format!(
            "<h1>Quick check</h1>\n{error}<form method=\"post\" action=\"/{action}\">\n\
             <label for=\"answer\">What is {prompt}?</label>\n\
             <input type=\"hidden\" name=\"challenge_id\" value=\"{id}\">\n\
             <input id=\"answer\" name=\"answer\" inputmode=\"numeric\" autocomplete=\"off\" required autofocus>\n\
             <button type=\"submit\">Continue</button>\n</form>",
            error = error,
            action = escape_html(code),
            prompt = escape_html(prompt),
            id = escape_html(challenge_id),
        ),
    )
}

pub fn error_page(message: &str) -> String {
    page("Error", &format!("<h1>{}</h1>", escape_html(message)))
}

pub fn render_page(code: &str, render: &Render) -> String {
    match render {
        Render::Blocked { reason } => blocked_page(reason),
        Render::Message { text } => message_page(text),
        Render::Landing { html } => landing_page(html),
        Render::Challenge {
            challenge_id,
            prompt,
            error,
        } => challenge_page(code, challenge_id, prompt, error.as_deref()),
    }
}
