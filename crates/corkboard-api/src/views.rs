//! Server-rendered pages, assembled with plain string formatting. All
//! user-supplied text goes through [`escape`] on the way out.

use corkboard_types::models::{Identity, Post, User};

/// Minimal HTML escaping for user-supplied text.
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Human copy for a flash code. Unknown codes render as-is so a stale
/// cookie still produces something visible.
pub fn flash_text(code: &str) -> &str {
    match code {
        "duplicate-identity" => "That email already has an account. Log in instead.",
        "invalid-credential" => "Incorrect email or password.",
        "invalid-email" => "That does not look like an email address.",
        "password-too-short" => "Passwords must be at least 8 characters.",
        other => other,
    }
}

fn layout(title: &str, identity: &Identity, flash: Option<&str>, body: &str) -> String {
    let nav = match identity.user() {
        Some(user) => format!(
            r#"<a href="/">Home</a> <a href="/user/{}">{}</a> <a href="/logout">Log out</a>"#,
            user.id,
            escape(&user.email)
        ),
        None => {
            r#"<a href="/">Home</a> <a href="/signup">Sign up</a> <a href="/login">Log in</a>"#
                .to_string()
        }
    };
    let flash_html = match flash {
        Some(code) => format!("<p class=\"flash\">{}</p>\n", escape(flash_text(code))),
        None => String::new(),
    };

    format!(
        "<!doctype html>\n\
         <html>\n\
         <head><meta charset=\"utf-8\"><title>{} | Corkboard</title></head>\n\
         <body>\n\
         <header><h1>Corkboard</h1><nav>{}</nav></header>\n\
         {}<main>\n{}</main>\n\
         <footer><small>Corkboard</small></footer>\n\
         </body>\n\
         </html>\n",
        escape(title),
        nav,
        flash_html,
        body
    )
}

pub fn home_page(identity: &Identity, flash: Option<&str>, posts: &[Post]) -> String {
    let mut body = String::from("<h2>Posts</h2>\n");
    body.push_str(
        "<form method=\"post\" action=\"/create\">\n\
         <input name=\"fname\" placeholder=\"Your name\">\n\
         <textarea name=\"fmessage\" placeholder=\"Say something\"></textarea>\n\
         <button type=\"submit\">Post</button>\n\
         </form>\n",
    );
    body.push_str("<ul class=\"posts\">\n");
    for post in posts {
        body.push_str(&post_item(post));
    }
    body.push_str("</ul>\n");
    layout("Home", identity, flash, &body)
}

fn post_item(post: &Post) -> String {
    let author = match post.author_id {
        Some(author_id) => format!(
            r#"<a href="/user/{}">{}</a>"#,
            author_id,
            escape(&post.author_name)
        ),
        None => escape(&post.author_name),
    };
    let edited = match post.modified_at {
        Some(at) => format!(" (edited {})", at.format("%Y-%m-%d %H:%M")),
        None => String::new(),
    };

    format!(
        "<li><strong>{}</strong> <p>{}</p> <small>{}{}</small> \
         <a href=\"/edit/{}\">Edit</a> <a href=\"/delete/{}\">Delete</a></li>\n",
        author,
        escape(&post.message),
        post.created_at.format("%Y-%m-%d %H:%M"),
        edited,
        post.id,
        post.id
    )
}

pub fn edit_page(identity: &Identity, post: &Post) -> String {
    let body = format!(
        "<h2>Edit post</h2>\n\
         <form method=\"post\" action=\"/edit/{}\">\n\
         <textarea name=\"fmessage\">{}</textarea>\n\
         <button type=\"submit\">Save</button>\n\
         </form>\n",
        post.id,
        escape(&post.message)
    );
    layout("Edit", identity, None, &body)
}

pub fn signup_page(flash: Option<&str>) -> String {
    let body = "<h2>Sign up</h2>\n\
         <form method=\"post\" action=\"/signup\">\n\
         <input name=\"email\" type=\"email\" placeholder=\"Email\">\n\
         <input name=\"password\" type=\"password\" placeholder=\"Password\">\n\
         <button type=\"submit\">Sign up</button>\n\
         </form>\n";
    layout("Sign up", &Identity::Anonymous, flash, body)
}

pub fn login_page(flash: Option<&str>) -> String {
    let body = "<h2>Log in</h2>\n\
         <form method=\"post\" action=\"/login\">\n\
         <input name=\"email\" type=\"email\" placeholder=\"Email\">\n\
         <input name=\"password\" type=\"password\" placeholder=\"Password\">\n\
         <button type=\"submit\">Log in</button>\n\
         </form>\n";
    layout("Log in", &Identity::Anonymous, flash, body)
}

pub fn profile_page(identity: &Identity, user: &User, posts: &[Post]) -> String {
    let mut body = format!(
        "<h2>{}</h2>\n<p>Member since {}</p>\n<ul class=\"posts\">\n",
        escape(&user.email),
        user.created_at.format("%Y-%m-%d")
    );
    for post in posts {
        body.push_str(&post_item(post));
    }
    body.push_str("</ul>\n");
    layout("Profile", identity, None, &body)
}

pub fn protected_page(identity: &Identity, user: &User) -> String {
    let body = format!(
        "<h2>Protected</h2>\n<p>Logged in as {}.</p>\n",
        escape(&user.email)
    );
    layout("Protected", identity, None, &body)
}

pub fn error_page(detail: &str) -> String {
    let body = format!(
        "<h2>Something went wrong</h2>\n<p>{}</p>\n",
        escape(detail)
    );
    layout("Error", &Identity::Anonymous, None, &body)
}
