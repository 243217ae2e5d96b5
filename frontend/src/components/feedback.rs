//! 通用反馈组件：加载中、空状态、内联错误和成功提示

use leptos::prelude::*;
use repairhub::controller::Submission;
use repairhub::view::ListView;

#[component]
pub fn Spinner() -> impl IntoView {
    view! {
        <div class="flex items-center justify-center py-16">
            <span class="loading loading-spinner loading-lg text-primary"></span>
        </div>
    }
}

#[component]
pub fn EmptyState(#[prop(into)] message: String) -> impl IntoView {
    view! {
        <div class="card bg-base-100 shadow-sm">
            <div class="card-body items-center text-center text-base-content/60">
                <p>{message}</p>
            </div>
        </div>
    }
}

/// 列表的三种状态：加载中 / 空 / 有数据
pub fn render_list<T, V>(list: ListView<T>, noun: &'static str, row: impl Fn(T) -> V) -> AnyView
where
    T: Clone,
    V: IntoView + 'static,
{
    let empty = list.empty_message(noun);
    match list {
        ListView::Loading => view! { <Spinner /> }.into_any(),
        ListView::Empty { .. } => view! { <EmptyState message=empty.unwrap_or_default() /> }.into_any(),
        ListView::Populated(items) => items.into_iter().map(row).collect_view().into_any(),
    }
}

/// 表单的写操作反馈：错误横幅（表单保持打开）和会自动消失的成功提示
///
/// `inline` 中的字段已由 `FieldError` 就地显示，横幅不再重复。
#[component]
pub fn SubmissionFeedback(
    #[prop(into)] submission: Signal<Submission>,
    #[prop(optional)] inline: &'static [&'static str],
) -> impl IntoView {
    let error = move || {
        submission.with(|s| {
            s.error
                .as_ref()
                .filter(|e| e.field().is_none_or(|f| !inline.contains(&f)))
                .map(|e| e.message().to_string())
        })
    };
    let notice = move || submission.with(|s| s.visible_notice().map(str::to_string));

    view! {
        {move || {
            error()
                .map(|text| {
                    view! {
                        <div role="alert" class="alert alert-error text-sm py-2">
                            <span>{text}</span>
                        </div>
                    }
                })
        }}
        {move || {
            notice()
                .map(|text| {
                    view! {
                        <div class="toast toast-top toast-end z-50">
                            <div class="alert alert-success shadow-lg">
                                <span>{text}</span>
                            </div>
                        </div>
                    }
                })
        }}
    }
}

/// 某个字段上的校验错误
#[component]
pub fn FieldError(
    #[prop(into)] submission: Signal<Submission>,
    field: &'static str,
) -> impl IntoView {
    move || {
        submission
            .with(|s| s.field_error(field).map(str::to_string))
            .map(|text| {
                view! {
                    <label class="label">
                        <span class="label-text-alt text-error">{text}</span>
                    </label>
                }
            })
    }
}

/// 提交中显示转圈并禁用
#[component]
pub fn SubmitButton(
    #[prop(into)] submission: Signal<Submission>,
    idle: &'static str,
    busy: &'static str,
) -> impl IntoView {
    let submitting = move || submission.with(|s| s.submitting);
    view! {
        <button class="btn btn-primary" type="submit" disabled=submitting>
            {move || {
                if submitting() {
                    view! { <span class="loading loading-spinner"></span> {busy} }.into_any()
                } else {
                    idle.into_any()
                }
            }}
        </button>
    }
}
