//! Extraction helpers for YouTube Music `youtubei` responses.
//!
//! The renderer tree is deeply nested and its outer layout changes between
//! client versions, so lookups search for the stable inner renderers by key
//! instead of following a fixed path.

use serde_json::Value;

const PLAY_BUTTON_VIDEO_ID: &str = "/overlay/musicItemThumbnailOverlayRenderer/content/musicPlayButtonRenderer/playNavigationEndpoint/watchEndpoint/videoId";

/// Depth-first search for the first value stored under `key`.
pub fn find_key<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    match value {
        Value::Object(map) => {
            if let Some(found) = map.get(key) {
                return Some(found);
            }
            map.values().find_map(|v| find_key(v, key))
        }
        Value::Array(items) => items.iter().find_map(|v| find_key(v, key)),
        _ => None,
    }
}

/// Video id of a `musicResponsiveListItemRenderer`.
pub fn item_video_id(renderer: &Value) -> Option<String> {
    renderer
        .pointer("/playlistItemData/videoId")
        .or_else(|| renderer.pointer(PLAY_BUTTON_VIDEO_ID))
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Video id of the first song in a filtered search response.
pub fn first_search_video_id(response: &Value) -> Option<String> {
    let shelf = find_key(response, "musicShelfRenderer")?;
    shelf["contents"]
        .as_array()?
        .iter()
        .filter_map(|item| item.get("musicResponsiveListItemRenderer"))
        .find_map(item_video_id)
}

/// Items of the first page of a playlist browse response, or of a
/// continuation response.
fn playlist_items(response: &Value) -> Option<&Vec<Value>> {
    find_key(response, "musicPlaylistShelfRenderer")
        .and_then(|shelf| shelf["contents"].as_array())
        .or_else(|| find_key(response, "continuationItems").and_then(Value::as_array))
}

/// Video ids of the playable tracks on one playlist page, in playlist order.
/// Unavailable tracks carry no `playlistItemData` and are skipped.
pub fn playlist_video_ids(response: &Value) -> Vec<String> {
    playlist_items(response)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.get("musicResponsiveListItemRenderer"))
                .filter_map(|renderer| {
                    renderer
                        .pointer("/playlistItemData/videoId")
                        .and_then(Value::as_str)
                        .map(str::to_string)
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Token for the next playlist page, if any.
pub fn continuation_token(response: &Value) -> Option<String> {
    playlist_items(response)?
        .iter()
        .filter_map(|item| item.get("continuationItemRenderer"))
        .find_map(|renderer| {
            renderer
                .pointer("/continuationEndpoint/continuationCommand/token")
                .and_then(Value::as_str)
                .map(str::to_string)
        })
}
