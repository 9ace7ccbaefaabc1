//! Browser glue: JSON file downloads and document-level settings
//! application. Native builds get logging no-ops so shared views compile
//! everywhere.

use store::{FontSize, Language, Theme, UserSettings};

/// Offer `contents` as a JSON file download named `filename`.
#[cfg(target_arch = "wasm32")]
pub fn download_json(filename: &str, contents: &str) {
    use wasm_bindgen::JsCast;

    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };
    let Some(body) = document.body() else {
        return;
    };

    let parts = js_sys::Array::new();
    parts.push(&wasm_bindgen::JsValue::from_str(contents));
    let options = web_sys::BlobPropertyBag::new();
    options.set_type("application/json");
    let Ok(blob) = web_sys::Blob::new_with_str_sequence_and_options(&parts, &options) else {
        return;
    };
    let Ok(url) = web_sys::Url::create_object_url_with_blob(&blob) else {
        return;
    };

    let Ok(element) = document.create_element("a") else {
        return;
    };
    let Ok(anchor) = element.dyn_into::<web_sys::HtmlAnchorElement>() else {
        return;
    };
    anchor.set_href(&url);
    anchor.set_download(filename);
    let _ = body.append_child(&anchor);
    anchor.click();
    let _ = body.remove_child(&anchor);
    let _ = web_sys::Url::revoke_object_url(&url);
}

#[cfg(not(target_arch = "wasm32"))]
pub fn download_json(filename: &str, contents: &str) {
    tracing::info!("export {filename} ({} bytes)", contents.len());
}

/// Reflect the theme on the document root (`data-theme`). `auto` resolves
/// against the OS color-scheme preference.
#[cfg(target_arch = "wasm32")]
pub fn apply_theme(theme: Theme) {
    let resolved = match theme {
        Theme::Auto => {
            let prefers_dark = web_sys::window()
                .and_then(|w| w.match_media("(prefers-color-scheme: dark)").ok().flatten())
                .map(|query| query.matches())
                .unwrap_or(false);
            if prefers_dark {
                "dark"
            } else {
                "light"
            }
        }
        other => other.as_str(),
    };
    if let Some(root) = document_root() {
        let _ = root.set_attribute("data-theme", resolved);
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn apply_theme(_theme: Theme) {}

/// Reflect the language on the document root (`lang`).
#[cfg(target_arch = "wasm32")]
pub fn apply_language(language: Language) {
    if let Some(root) = document_root() {
        let _ = root.set_attribute("lang", language.as_str());
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn apply_language(_language: Language) {}

/// Reflect the base font size on the document root (`--base-font-size`).
#[cfg(target_arch = "wasm32")]
fn apply_font_size(size: FontSize) {
    use wasm_bindgen::JsCast;

    let px = match size {
        FontSize::Small => "14px",
        FontSize::Medium => "16px",
        FontSize::Large => "18px",
    };
    let Some(root) = document_root() else {
        return;
    };
    if let Ok(element) = root.dyn_into::<web_sys::HtmlElement>() {
        let _ = element.style().set_property("--base-font-size", px);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn apply_font_size(_size: FontSize) {}

/// Apply every document-level effect of the settings at once.
pub fn apply_settings(settings: &UserSettings) {
    apply_theme(settings.theme);
    apply_language(settings.language);
    apply_font_size(settings.display.font_size);
}

#[cfg(target_arch = "wasm32")]
fn document_root() -> Option<web_sys::Element> {
    web_sys::window()?.document()?.document_element()
}
