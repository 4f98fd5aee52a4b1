//! Home tab view.

use crate::slack::{Block, PublishView, View};

const PURPOSE: &str = ":wave: This app gives suggestions on which channels to join based on volunteers' introductions. It's just a simple keyword match that won't persist any data about you.";

const CONTRIBUTING: &str = "If you'd like to contribute, you can find the code here. Feel free to make a PR, but you'll have to reach out to @Katie since she's hosting it.";

const ATTRIBUTION: &str = "Author: @Katie\nAdmin: @Zach - Slack Admin ";

/// Build the static home view.
pub fn home_view() -> View {
    View::home(vec![
        Block::markdown_section(PURPOSE),
        Block::Divider,
        Block::markdown_section(CONTRIBUTING),
        Block::plain_context(ATTRIBUTION),
    ])
}

/// Build the `views.publish` request for `user_id`.
pub fn render_home(user_id: &str) -> PublishView {
    PublishView {
        user_id: user_id.to_string(),
        view: home_view(),
    }
}
