//! Floating assistant chat widget.

use std::cell::RefCell;
use std::rc::Rc;

use folio::assistant::{submit, ChatMessage, Session};
use folio::citations::is_safe_link;
use folio::config::AssistantConfig;
use folio::gemini::GeminiClient;
use folio::profile::{ACHIEVEMENTS, OWNER};
use leptos::html::Div;
use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::markdown::render_reply;
use crate::ui_model::{bubble_class, bubble_row_class};

/// Credential baked in at build time. Blank values leave the assistant offline.
pub fn build_config() -> AssistantConfig {
    let key = option_env!("FOLIO_API_KEY").or(option_env!("API_KEY"));
    AssistantConfig::default().with_api_key(key)
}

#[component]
pub fn AiChat(#[prop(optional)] config: Option<AssistantConfig>) -> impl IntoView {
    let config = config.unwrap_or_else(build_config);
    let client = Rc::new(GeminiClient::from_config(&config));
    let session = Rc::new(RefCell::new(Session::for_profile(
        config,
        &OWNER,
        ACHIEVEMENTS,
    )));
    tracing::info!(
        online = session.borrow().augmentation_available(),
        "assistant session ready"
    );

    let thinking = StoredValue::new(session.borrow().phrases().thinking.clone());
    let (transcript, set_transcript) = signal(session.borrow().snapshot());
    session
        .borrow_mut()
        .subscribe(move |view| set_transcript.set(view.into()));

    let session = StoredValue::new_local(session);
    let client = StoredValue::new_local(client);

    let (open, set_open) = signal(false);
    let (draft, set_draft) = signal(String::new());
    let scroll_ref = NodeRef::<Div>::new();

    let pending = move || transcript.with(|t| t.pending);

    let send = move || {
        let text = draft.get_untracked();
        if text.trim().is_empty() || transcript.with_untracked(|t| t.pending) {
            return;
        }
        set_draft.set(String::new());

        let weak = session.with_value(Rc::downgrade);
        let client = client.get_value();
        spawn_local(async move {
            let outcome = submit(weak, &client, &text).await;
            tracing::debug!(?outcome, "chat submission settled");
        });
    };

    Effect::new(move |_| {
        transcript.track();
        open.track();
        if let Some(el) = scroll_ref.get() {
            el.set_scroll_top(el.scroll_height());
        }
    });

    let launcher = move || {
        view! {
            <button class="chat-launcher" on:click=move |_| set_open.set(true)>
                <span class="chat-launcher-icon">"💬"</span>
                <span class="chat-launcher-label">"Chat with AI"</span>
            </button>
        }
    };

    view! {
        <div class="chat-dock">
            <Show when=move || open.get() fallback=launcher>
                <div class="chat-panel glass">
                    <div class="chat-header">
                        <span class="chat-title">"🤖 渝文 AI 助手"</span>
                        <button class="chat-close" on:click=move |_| set_open.set(false)>
                            "✕"
                        </button>
                    </div>

                    <div class="chat-scroll" node_ref=scroll_ref>
                        <For
                            each=move || transcript.get().messages.into_iter().enumerate()
                            key=|(i, _)| *i
                            children=|(_, message)| view! { <ChatBubble message=message /> }
                        />
                        <Show when=pending>
                            <div class="bubble-row bubble-row-assistant">
                                <div class="bubble bubble-assistant bubble-thinking">
                                    {move || thinking.get_value()}
                                </div>
                            </div>
                        </Show>
                    </div>

                    <div class="chat-input-row">
                        <input
                            type="text"
                            class="chat-input"
                            placeholder="问问关于牛渝文的事..."
                            prop:value=move || draft.get()
                            on:input=move |ev| set_draft.set(event_target_value(&ev))
                            on:keydown=move |ev| {
                                if ev.key() == "Enter" {
                                    send();
                                }
                            }
                        />
                        <button class="chat-send" disabled=pending on:click=move |_| send()>
                            "➤"
                        </button>
                    </div>
                </div>
            </Show>
        </div>
    }
}

#[component]
fn ChatBubble(message: ChatMessage) -> impl IntoView {
    let row = bubble_row_class(message.role());
    let class = bubble_class(message.role(), message.kind());

    // User text is shown verbatim; assistant replies are Markdown.
    let body = if message.is_user() {
        view! { <p class="bubble-text">{message.text().to_string()}</p> }.into_any()
    } else {
        view! { <div class="bubble-text markdown" inner_html=render_reply(message.text())></div> }
            .into_any()
    };

    // Already filtered by the session; re-checked because this is an `href`.
    let sources: Vec<_> = message
        .sources()
        .iter()
        .filter(|c| is_safe_link(&c.uri))
        .cloned()
        .collect();
    let sources = (!sources.is_empty()).then(|| {
        view! {
            <div class="bubble-sources">
                <span class="bubble-sources-label">"参考来源"</span>
                <ul>
                    {sources
                        .into_iter()
                        .map(|c| {
                            view! {
                                <li>
                                    <a href=c.uri target="_blank" rel="noopener noreferrer">
                                        {c.title}
                                    </a>
                                </li>
                            }
                        })
                        .collect_view()}
                </ul>
            </div>
        }
    });

    view! {
        <div class=row>
            <div class=class>
                {body}
                {sources}
            </div>
        </div>
    }
}
