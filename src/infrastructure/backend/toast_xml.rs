//! Toast XML for Windows notifications
//!
//! Rendering and activation parsing are plain string work, available on every
//! platform.

use crate::domain::{Notification, Urgency};

use crate::application::ports::SendRequest;

/// Launch argument of a click on the toast body
pub const DEFAULT_ARGUMENTS: &str = "default";

/// Activation arguments of the reply button
pub const REPLY_ARGUMENTS: &str = "action=reply&";

/// Prefix of button activation arguments, followed by the button identifier
pub const BUTTON_ARGUMENTS_PREFIX: &str = "action=button&id=";

/// Id of the reply text input
pub const REPLY_INPUT_ID: &str = "textBox";

/// Toast audio source for the default sound
pub const DEFAULT_AUDIO_SOURCE: &str = "ms-winsoundevent:Notification.Default";

/// What a toast activation stands for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    Clicked,
    Reply,
    Button(String),
    Unknown(String),
}

/// Interpret the arguments of a toast activation
pub fn parse_activation(arguments: &str) -> Activation {
    if arguments == DEFAULT_ARGUMENTS {
        Activation::Clicked
    } else if arguments == REPLY_ARGUMENTS {
        Activation::Reply
    } else if let Some(identifier) = arguments.strip_prefix(BUTTON_ARGUMENTS_PREFIX) {
        Activation::Button(identifier.to_string())
    } else {
        Activation::Unknown(arguments.to_string())
    }
}

/// Whether the toast should be shown with high priority
pub fn is_high_priority(notification: &Notification) -> bool {
    notification.urgency() == Urgency::Critical
}

/// Minimal XML element tree
#[derive(Debug, Clone, Default)]
struct Element {
    name: &'static str,
    attributes: Vec<(&'static str, String)>,
    text: Option<String>,
    children: Vec<Element>,
}

impl Element {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            ..Default::default()
        }
    }

    fn attr(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.attributes.push((key, value.into()));
        self
    }

    fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    fn child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    fn write(&self, out: &mut String) {
        out.push('<');
        out.push_str(self.name);
        for (key, value) in &self.attributes {
            out.push(' ');
            out.push_str(key);
            out.push_str("=\"");
            out.push_str(&escape(value));
            out.push('"');
        }

        if self.text.is_none() && self.children.is_empty() {
            out.push_str("/>");
            return;
        }

        out.push('>');
        if let Some(text) = &self.text {
            out.push_str(&escape(text));
        }
        for child in &self.children {
            child.write(out);
        }
        out.push_str("</");
        out.push_str(self.name);
        out.push('>');
    }
}

fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Render the toast document for a send request
pub fn render(request: &SendRequest<'_>) -> String {
    let notification = request.notification;

    let mut binding = Element::new("binding")
        .attr("template", "ToastGeneric")
        .child(Element::new("text").text(notification.title()))
        .child(Element::new("text").text(notification.message()));

    if let Some(uri) = request.icon().and_then(|icon| icon.as_uri()) {
        binding = binding.child(
            Element::new("image")
                .attr("placement", "appLogoOverride")
                .attr("src", uri),
        );
    }

    if let Some(attachment) = notification.attachment() {
        binding = binding.child(
            Element::new("image")
                .attr("placement", "hero")
                .attr("src", attachment.as_uri()),
        );
    }

    let mut actions = Element::new("actions");

    if let Some(reply_field) = notification.reply_field() {
        actions = actions.child(
            Element::new("input")
                .attr("id", REPLY_INPUT_ID)
                .attr("type", "text")
                .attr("placeHolderContent", reply_field.title()),
        );
        let mut reply = Element::new("action")
            .attr("content", reply_field.button_title())
            .attr("activationType", "background")
            .attr("arguments", REPLY_ARGUMENTS);
        if notification.buttons().is_empty() {
            reply = reply.attr("hint-inputId", REPLY_INPUT_ID);
        }
        actions = actions.child(reply);
    }

    for button in notification.buttons() {
        actions = actions.child(
            Element::new("action")
                .attr("content", button.title())
                .attr("activationType", "background")
                .attr(
                    "arguments",
                    format!("{}{}", BUTTON_ARGUMENTS_PREFIX, button.identifier()),
                ),
        );
    }

    let mut toast = Element::new("toast").attr("launch", DEFAULT_ARGUMENTS);

    if let Some(thread) = notification.thread() {
        toast = toast.child(
            Element::new("header")
                .attr("id", thread)
                .attr("title", thread)
                .attr("arguments", DEFAULT_ARGUMENTS)
                .attr("activationType", "background"),
        );
    }

    toast = toast
        .child(Element::new("visual").child(binding))
        .child(actions);

    let audio = match notification.sound() {
        Some(sound) if sound.is_default_sound() => {
            Element::new("audio").attr("src", DEFAULT_AUDIO_SOURCE)
        }
        Some(sound) => Element::new("audio").attr("src", sound.as_name_or_uri()),
        None => Element::new("audio").attr("silent", "true"),
    };
    toast = toast.child(audio);

    let mut out = String::new();
    toast.write(&mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Button, ReplyField, Resource};

    fn render_notification(notification: &Notification) -> String {
        render(&SendRequest::new(notification.identifier(), notification))
    }

    #[test]
    fn plain_toast() {
        let xml = render_notification(&Notification::new("Title", "Message"));
        assert_eq!(
            xml,
            "<toast launch=\"default\"><visual><binding template=\"ToastGeneric\">\
             <text>Title</text><text>Message</text></binding></visual>\
             <actions/><audio silent=\"true\"/></toast>"
        );
    }

    #[test]
    fn text_is_escaped() {
        let xml = render_notification(&Notification::new("Tom & Jerry", "<b>\"hi\"</b>"));
        assert!(xml.contains("<text>Tom &amp; Jerry</text>"));
        assert!(xml.contains("<text>&lt;b&gt;&quot;hi&quot;&lt;/b&gt;</text>"));
    }

    #[test]
    fn named_icons_are_skipped_and_files_become_logo() {
        let named = render_notification(&Notification::new("t", "m").with_icon(Resource::name("mail")));
        assert!(!named.contains("appLogoOverride"));

        let file = render_notification(
            &Notification::new("t", "m").with_icon(Resource::path("/tmp/icon.png")),
        );
        assert!(file.contains("<image placement=\"appLogoOverride\" src=\"file:///tmp/icon.png\"/>"));
    }

    #[test]
    fn app_icon_is_used_when_notification_has_none() {
        let notification = Notification::new("t", "m");
        let app_icon = Resource::path("/opt/app/icon.png");
        let mut request = SendRequest::new(notification.identifier(), &notification);
        request.app_icon = Some(&app_icon);

        assert!(render(&request).contains("src=\"file:///opt/app/icon.png\""));
    }

    #[test]
    fn attachment_is_hero_image() {
        let xml = render_notification(
            &Notification::new("t", "m").with_attachment(std::path::PathBuf::from("/tmp/cat.png")),
        );
        assert!(xml.contains("<image placement=\"hero\" src=\"file:///tmp/cat.png\"/>"));
    }

    #[test]
    fn reply_without_buttons_hints_input() {
        let xml = render_notification(
            &Notification::new("t", "m").with_reply_field(ReplyField::new()),
        );
        assert!(xml.contains("<input id=\"textBox\" type=\"text\" placeHolderContent=\"Reply\"/>"));
        assert!(xml.contains("arguments=\"action=reply&amp;\" hint-inputId=\"textBox\""));
    }

    #[test]
    fn reply_with_buttons_has_no_input_hint() {
        let xml = render_notification(
            &Notification::new("t", "m")
                .with_reply_field(ReplyField::new())
                .with_button(Button::new("Later").with_identifier("later")),
        );
        assert!(!xml.contains("hint-inputId"));
        assert!(xml.contains(
            "<action content=\"Later\" activationType=\"background\" arguments=\"action=button&amp;id=later\"/>"
        ));
    }

    #[test]
    fn thread_becomes_header() {
        let xml = render_notification(&Notification::new("t", "m").with_thread("chat-42"));
        assert!(xml.starts_with("<toast launch=\"default\"><header id=\"chat-42\" title=\"chat-42\""));
    }

    #[test]
    fn audio_sources() {
        let default = render_notification(
            &Notification::new("t", "m").with_sound(Resource::default_sound()),
        );
        assert!(default.contains("<audio src=\"ms-winsoundevent:Notification.Default\"/>"));

        let named = render_notification(
            &Notification::new("t", "m").with_sound(Resource::name("ms-winsoundevent:Notification.IM")),
        );
        assert!(named.contains("<audio src=\"ms-winsoundevent:Notification.IM\"/>"));
    }

    #[test]
    fn activation_parsing() {
        assert_eq!(parse_activation("default"), Activation::Clicked);
        assert_eq!(parse_activation("action=reply&"), Activation::Reply);
        assert_eq!(
            parse_activation("action=button&id=later"),
            Activation::Button("later".to_string())
        );
        assert_eq!(
            parse_activation("bogus"),
            Activation::Unknown("bogus".to_string())
        );
    }

    #[test]
    fn critical_is_high_priority() {
        assert!(is_high_priority(&Notification::new("t", "m").with_urgency(Urgency::Critical)));
        assert!(!is_high_priority(&Notification::new("t", "m")));
    }
}
