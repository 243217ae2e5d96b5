//! 注册 / 登录入口
//!
//! 两个表单共用一个页面，按 tab 切换；成功后标记已登录并跳到控制器给出的页面。

use crate::auth::use_app;
use crate::components::feedback::{FieldError, SubmissionFeedback, SubmitButton};
use crate::components::page::Page;
use crate::web::router::use_router;
use leptos::prelude::*;
use repairhub::controller::{LoginForm, SignupForm, SignupInput};
use repairhub::shared::Role;

const LOGIN_FIELDS: &[&str] = &["email", "password"];
const SIGNUP_FIELDS: &[&str] = &["name", "email", "password", "confirm_password", "role"];

#[component]
pub fn AuthPage() -> impl IntoView {
    let app = use_app();
    let hub = app.hub();
    let ttl = hub.config.notice_ttl();
    let login = Page::mount(LoginForm::new(&hub), ttl);
    let signup = Page::mount(SignupForm::new(&hub), ttl);
    let (show_signup, set_show_signup) = signal(true);

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-lg">
                <div class="text-center mb-4">
                    <h1 class="text-3xl font-bold">"RepairHub"</h1>
                    <p class="text-base-content/70">
                        "Connect car owners, repair shops and insurers"
                    </p>
                </div>
                <div role="tablist" class="tabs tabs-boxed w-full">
                    <a
                        role="tab"
                        class=move || if show_signup.get() { "tab tab-active" } else { "tab" }
                        on:click=move |_| set_show_signup.set(true)
                    >
                        "Sign up"
                    </a>
                    <a
                        role="tab"
                        class=move || if show_signup.get() { "tab" } else { "tab tab-active" }
                        on:click=move |_| set_show_signup.set(false)
                    >
                        "Log in"
                    </a>
                </div>
                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    {move || {
                        if show_signup.get() {
                            view! { <SignupCard page=signup /> }.into_any()
                        } else {
                            view! { <LoginCard page=login /> }.into_any()
                        }
                    }}
                </div>
            </div>
        </div>
    }
}

#[component]
fn LoginCard(page: Page<LoginForm>) -> impl IntoView {
    let app = use_app();
    let router = use_router();
    let submission = Signal::derive(move || page.state());
    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let (email, password) = (email.get_untracked(), password.get_untracked());
        page.spawn(move |form| async move {
            if let Some(next) = form.submit(&email, &password).await {
                app.signed_in();
                router.navigate_to(next);
            }
        });
    };

    view! {
        <form class="card-body" on:submit=on_submit>
            <SubmissionFeedback submission=submission inline=LOGIN_FIELDS />
            <div class="form-control">
                <label class="label" for="login-email">
                    <span class="label-text">"Email"</span>
                </label>
                <input
                    id="login-email"
                    type="email"
                    class="input input-bordered"
                    on:input=move |ev| set_email.set(event_target_value(&ev))
                    prop:value=email
                />
                <FieldError submission=submission field="email" />
            </div>
            <div class="form-control">
                <label class="label" for="login-password">
                    <span class="label-text">"Password"</span>
                </label>
                <input
                    id="login-password"
                    type="password"
                    placeholder="••••••••"
                    class="input input-bordered"
                    on:input=move |ev| set_password.set(event_target_value(&ev))
                    prop:value=password
                />
                <FieldError submission=submission field="password" />
            </div>
            <div class="form-control mt-6">
                <SubmitButton submission=submission idle="Log in" busy="Signing in..." />
            </div>
        </form>
    }
}

#[component]
fn SignupCard(page: Page<SignupForm>) -> impl IntoView {
    let app = use_app();
    let router = use_router();
    let submission = Signal::derive(move || page.state());
    let input = RwSignal::new(SignupInput {
        role: Some(Role::CarOwner),
        ..Default::default()
    });

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let input = input.get_untracked();
        page.spawn(move |form| async move {
            if let Some(next) = form.submit(&input).await {
                app.signed_in();
                router.navigate_to(next);
            }
        });
    };

    let text_field = move |id: &'static str, label: &'static str, kind: &'static str, field: fn(&mut SignupInput) -> &mut String| {
        view! {
            <div class="form-control">
                <label class="label" for=id>
                    <span class="label-text">{label}</span>
                </label>
                <input
                    id=id
                    type=kind
                    class="input input-bordered"
                    on:input=move |ev| input.update(|i| *field(i) = event_target_value(&ev))
                />
                <FieldError submission=submission field=id />
            </div>
        }
    };

    let roles = Role::ALL
        .iter()
        .map(|role| view! { <option value=role.as_str()>{role.label()}</option> })
        .collect_view();

    view! {
        <form class="card-body" on:submit=on_submit>
            <SubmissionFeedback submission=submission inline=SIGNUP_FIELDS />
            {text_field("name", "Full name", "text", |i| &mut i.name)}
            {text_field("email", "Email", "email", |i| &mut i.email)}
            {text_field("password", "Password", "password", |i| &mut i.password)}
            {text_field("confirm_password", "Confirm password", "password", |i| &mut i.confirm_password)}
            <div class="form-control">
                <label class="label" for="role">
                    <span class="label-text">"I am a"</span>
                </label>
                <select
                    id="role"
                    class="select select-bordered"
                    on:change=move |ev| input.update(|i| i.role = Role::parse(&event_target_value(&ev)))
                >
                    {roles}
                </select>
                <FieldError submission=submission field="role" />
            </div>
            {text_field("phone", "Phone (optional)", "tel", |i| &mut i.phone)}
            {text_field("address", "Address (optional)", "text", |i| &mut i.address)}
            <div class="form-control mt-6">
                <SubmitButton submission=submission idle="Create account" busy="Creating..." />
            </div>
        </form>
    }
}
