/// Options page: edit preferences and grant the info page permission

use crate::controller::MSG_CAN_BLOCK;
use crate::preferences::Preferences;
use crate::storage::LocalStorage;
use patternfly_yew::prelude::*;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;

// Import JS bridge functions
#[wasm_bindgen(module = "/options.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn requestInterceptPermission() -> Result<JsValue, JsValue>;

    fn notifyBackground(msg: &str);
}

#[derive(Clone, PartialEq)]
enum SaveState {
    Idle,
    Saved,
    Error(String),
}

#[derive(Clone, PartialEq)]
enum PermissionState {
    Unknown,
    Requesting,
    Granted,
    Denied,
}

/// Parse the timeout field; an unusable value only matters when notifications
/// close by themselves, otherwise `current` is kept
pub fn parse_timeout(input: &str, has_timeout: bool, current: u32) -> Result<u32, String> {
    match input.trim().parse::<u32>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ if !has_timeout => Ok(current),
        _ => Err(format!("\"{}\" is not a positive number of seconds", input.trim())),
    }
}

fn load_preferences() -> Preferences {
    match LocalStorage::open() {
        Ok(storage) => Preferences::load(&storage),
        Err(e) => {
            log::warn!("Showing default preferences: {}", e);
            Preferences::default()
        }
    }
}

fn save_preferences(prefs: &Preferences) -> Result<(), String> {
    let mut storage = LocalStorage::open().map_err(|e| e.to_string())?;
    prefs.save(&mut storage).map_err(|e| e.to_string())
}

#[function_component(OptionsPage)]
pub fn options_page() -> Html {
    let prefs = use_state(load_preferences);
    let timeout_input = {
        let initial = prefs.timeout_secs;
        use_state(move || initial.to_string())
    };
    let save_state = use_state(|| SaveState::Idle);
    let permission = use_state(|| PermissionState::Unknown);

    let on_show_info = {
        let prefs = prefs.clone();
        Callback::from(move |e: Event| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                let mut next = *prefs;
                next.show_info = input.checked();
                prefs.set(next);
            }
        })
    };

    let on_has_timeout = {
        let prefs = prefs.clone();
        Callback::from(move |e: Event| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                let mut next = *prefs;
                next.has_timeout = input.checked();
                prefs.set(next);
            }
        })
    };

    let on_timeout_input = {
        let timeout_input = timeout_input.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                timeout_input.set(input.value());
            }
        })
    };

    let on_save = {
        let prefs = prefs.clone();
        let timeout_input = timeout_input.clone();
        let save_state = save_state.clone();

        Callback::from(move |_| {
            let mut next = *prefs;
            match parse_timeout(&timeout_input, next.has_timeout, next.timeout_secs) {
                Ok(secs) => {
                    next.timeout_secs = secs;
                    match save_preferences(&next) {
                        Ok(()) => {
                            prefs.set(next);
                            save_state.set(SaveState::Saved);
                        }
                        Err(e) => save_state.set(SaveState::Error(format!("Failed to save: {}", e))),
                    }
                }
                Err(e) => save_state.set(SaveState::Error(e)),
            }
        })
    };

    let on_request_permission = {
        let permission = permission.clone();

        Callback::from(move |_| {
            let permission = permission.clone();
            permission.set(PermissionState::Requesting);

            spawn_local(async move {
                match requestInterceptPermission().await {
                    Ok(granted) if granted.as_bool() == Some(true) => {
                        notifyBackground(MSG_CAN_BLOCK);
                        permission.set(PermissionState::Granted);
                    }
                    Ok(_) => permission.set(PermissionState::Denied),
                    Err(e) => {
                        log::warn!("Permission request failed: {:?}", e);
                        permission.set(PermissionState::Denied);
                    }
                }
            });
        })
    };

    html! {
        <div class="padding-20">
            <h1 class="options-title">{"Urly options"}</h1>

            <div class="flex-column-gap">
                <label class="option-row">
                    <input
                        type="checkbox"
                        checked={prefs.show_info}
                        onchange={on_show_info}
                    />
                    {" Show an info page before following urly.fi links"}
                </label>

                <label class="option-row">
                    <input
                        type="checkbox"
                        checked={prefs.has_timeout}
                        onchange={on_has_timeout}
                    />
                    {" Close notifications automatically"}
                </label>

                <label class="option-row">
                    {"After "}
                    <input
                        type="number"
                        min="1"
                        class="timeout-input"
                        value={(*timeout_input).clone()}
                        disabled={!prefs.has_timeout}
                        oninput={on_timeout_input}
                    />
                    {" seconds"}
                </label>

                <Button onclick={on_save} variant={ButtonVariant::Primary}>
                    {"Save"}
                </Button>

                {match &*save_state {
                    SaveState::Saved => html! {
                        <Alert r#type={AlertType::Success} title={"Options saved"} inline={true}>
                        </Alert>
                    },
                    SaveState::Error(err) => html! {
                        <Alert r#type={AlertType::Danger} title={"Error"} inline={true}>
                            {err.clone()}
                        </Alert>
                    },
                    SaveState::Idle => html! {}
                }}
            </div>

            <div class="message-top-margin">
                <p class="message-text">
                    {"Info pages need permission to inspect navigation to urly.fi."}
                </p>
                <Button
                    onclick={on_request_permission}
                    disabled={*permission == PermissionState::Requesting || *permission == PermissionState::Granted}
                    variant={ButtonVariant::Secondary}
                >
                    {"Enable info pages"}
                </Button>

                {match &*permission {
                    PermissionState::Granted => html! {
                        <Alert r#type={AlertType::Success} title={"Info pages enabled"} inline={true}>
                        </Alert>
                    },
                    PermissionState::Denied => html! {
                        <Alert r#type={AlertType::Warning} title={"Permission was not granted"} inline={true}>
                        </Alert>
                    },
                    PermissionState::Unknown | PermissionState::Requesting => html! {}
                }}
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timeout_accepts_positive_seconds() {
        assert_eq!(parse_timeout("7", true, 5), Ok(7));
        assert_eq!(parse_timeout(" 30 ", true, 5), Ok(30));
    }

    #[test]
    fn test_parse_timeout_rejects_unusable_values_when_enabled() {
        assert!(parse_timeout("0", true, 5).is_err());
        assert!(parse_timeout("soon", true, 5).is_err());
        assert!(parse_timeout("", true, 5).is_err());
    }

    #[test]
    fn test_parse_timeout_keeps_current_when_disabled() {
        assert_eq!(parse_timeout("soon", false, 5), Ok(5));
        assert_eq!(parse_timeout("0", false, 5), Ok(5));
        assert_eq!(parse_timeout("9", false, 5), Ok(9));
    }
}
