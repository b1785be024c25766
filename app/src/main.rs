#![allow(non_snake_case)]

use dioxus::prelude::*;
use dioxus_logger::tracing::{Level, warn};
use toast_web::hooks::{use_toaster, use_toaster_provider};
use toast_web::{Severity, ToastConfig, ToastOptions, Toaster};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::HtmlDialogElement;

fn main() {
    dioxus_logger::init(Level::INFO).expect("failed to init logger");
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    use_toaster_provider(ToastConfig::default());

    rsx! {
        main { class: "toast-demo",
            h1 { "Toasts" }
            section { class: "severity-buttons",
                for severity in Severity::ALL {
                    SeverityButton { severity }
                }
            }
            Extras {}
        }
    }
}

#[component]
fn SeverityButton(severity: Severity) -> Element {
    let toaster = use_toaster();
    rsx! {
        button {
            class: format!("btn {}", severity.class_name()),
            onclick: move |_| {
                toaster.show(
                    severity,
                    format!("Something {severity} happened"),
                    Some("Demo"),
                    ToastOptions::default(),
                );
            },
            "{severity}"
        }
    }
}

#[component]
fn Extras() -> Element {
    let toaster = use_toaster();
    let mut syncs = use_signal(|| 0u32);

    rsx! {
        section { class: "extra-buttons",
            button {
                onclick: {
                    let toaster = toaster.clone();
                    move |_| {
                        syncs += 1;
                        toaster.info(
                            format!("Sync #{} finished", syncs()),
                            None,
                            ToastOptions::new().topic("sync"),
                        );
                    }
                },
                "Sync (replaces previous)"
            }
            button {
                onclick: {
                    let toaster = toaster.clone();
                    move |_| {
                        toaster.warning(
                            "Click to dismiss",
                            Some("Sticky"),
                            ToastOptions::new().persistent(),
                        );
                    }
                },
                "Persistent"
            }
            button {
                onclick: move |_| {
                    if let Err(err) = open_dialog(&toaster) {
                        warn!(error = ?err, "Failed to open dialog");
                    }
                },
                "Open dialog"
            }
        }
    }
}

/// Open a modal dialog outside the Dioxus tree so toasts have to follow it
fn open_dialog(toaster: &Toaster) -> Result<(), JsValue> {
    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let body = document
        .body()
        .ok_or_else(|| JsValue::from_str("no body"))?;

    let dialog: HtmlDialogElement = document.create_element("dialog")?.dyn_into()?;
    let text = document.create_element("p")?;
    text.set_text_content(Some("Toasts stay on top of this dialog."));
    dialog.append_child(&text)?;

    let close = document.create_element("button")?;
    close.set_text_content(Some("Close"));
    let target = dialog.clone();
    let on_close = Closure::once_into_js(move || target.remove());
    close.add_event_listener_with_callback("click", on_close.unchecked_ref())?;
    dialog.append_child(&close)?;

    body.append_child(&dialog)?;
    dialog.show_modal()?;

    toaster.success("Shown inside the dialog", None, ToastOptions::default());
    Ok(())
}
