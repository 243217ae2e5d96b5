use leptos::prelude::*;
use repairhub::view::Lightbox;

/// 线索图片的全屏轮播
#[component]
pub fn LightboxView(
    #[prop(into)] lightbox: Signal<Lightbox>,
    on_prev: Callback<()>,
    on_next: Callback<()>,
    on_close: Callback<()>,
) -> impl IntoView {
    move || {
        lightbox.with(|lb| {
            let image = lb.current()?.to_string();
            let position = lb.position().unwrap_or_default();
            Some(view! {
                <div class="modal modal-open">
                    <div class="modal-box max-w-4xl p-2 bg-base-300">
                        <img src=image class="w-full max-h-[70vh] object-contain rounded" />
                        <div class="flex items-center justify-between mt-2">
                            <button class="btn btn-sm btn-ghost" on:click=move |_| on_prev.run(())>
                                "‹ Prev"
                            </button>
                            <span class="text-sm">{position}</span>
                            <button class="btn btn-sm btn-ghost" on:click=move |_| on_next.run(())>
                                "Next ›"
                            </button>
                        </div>
                    </div>
                    <div class="modal-backdrop" on:click=move |_| on_close.run(())></div>
                </div>
            })
        })
    }
}
