//! Fixed payloads shown when the portrait cannot be generated.

use fortune_core::{GeneratedPortrait, Portrait, ShareUrls, ShareableContent};
use std::collections::BTreeMap;

pub const DEMO_STORY_IMAGE: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mP8/5+hHgAHggJ/PchI7wAAAABJRU5ErkJggg==";

const THREADS_INTENT: &str = "https://threads.net/intent/post?text=";
const TWITTER_INTENT: &str = "https://twitter.com/intent/tweet?text=";
const TWEET_MAX_CHARS: usize = 280;

pub fn demo_portrait() -> Portrait {
    let content_dna = BTreeMap::from([
        ("personal".to_string(), 45.0),
        ("educational".to_string(), 30.0),
        ("entertainment".to_string(), 25.0),
    ]);

    Portrait {
        archetype: Some("The Authentic Storyteller".to_string()),
        content_dna,
        posting_spirit: Some("Night Owl Creator".to_string()),
        engagement_insight: Some("Your audience craves your vulnerable authenticity".to_string()),
        creator_level: Some("Rising Star ⭐".to_string()),
        mystical_advice: Some("The universe rewards consistency over perfection".to_string()),
        shareable_quote: Some(
            "✨ Your content resonates with the frequency of authenticity ✨".to_string(),
        ),
        total_posts: Some(12),
        avg_engagement: Some(4.2),
        extra: Default::default(),
    }
}

/// Share text built from whatever the portrait carries.
pub fn default_share_text(portrait: &Portrait, site_host: &str) -> String {
    let quote = portrait
        .shareable_quote
        .as_deref()
        .unwrap_or("✨ Your creative energy is unique ✨");
    let archetype = portrait
        .archetype
        .as_deref()
        .unwrap_or("The Emerging Creator");
    let posting_spirit = portrait
        .posting_spirit
        .as_deref()
        .unwrap_or("Digital Wanderer");

    format!(
        "🔮 Just discovered my Creator DNA! ✨\n\n\
         {quote}\n\n\
         My digital aura reveals:\n\
         🎭 Archetype: {archetype}\n\
         🌙 Posting Spirit: {posting_spirit}\n\n\
         What's YOUR creator personality? \n\n\
         Find out your mystical creator portrait 👇\n\
         {site_host}\n\n\
         #CreatorDNA #ThreadsPersonality #ContentCreator #CreatorQuiz"
    )
}

/// `https://threadsfortune.app` -> `threadsfortune.app`
pub fn site_host(share_origin: &str) -> String {
    url::Url::parse(share_origin)
        .ok()
        .and_then(|url| url.host_str().map(str::to_string))
        .unwrap_or_else(|| share_origin.to_string())
}

pub fn demo_shareable_content(portrait: &Portrait, site_host: &str) -> ShareableContent {
    let text = default_share_text(portrait, site_host);
    let tweet: String = text.chars().take(TWEET_MAX_CHARS).collect();

    ShareableContent {
        ig_story_image: Some(DEMO_STORY_IMAGE.to_string()),
        share_urls: ShareUrls {
            threads: Some(format!("{}{}", THREADS_INTENT, urlencoding::encode(&text))),
            twitter: Some(format!("{}{}", TWITTER_INTENT, urlencoding::encode(&tweet))),
            copy_text: Some(text),
            extra: Default::default(),
        },
        extra: Default::default(),
    }
}

pub fn demo_generated(share_origin: &str) -> GeneratedPortrait {
    let portrait = demo_portrait();
    let shareable_content = demo_shareable_content(&portrait, &site_host(share_origin));
    GeneratedPortrait {
        portrait,
        shareable_content,
    }
}
