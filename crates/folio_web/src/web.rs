use folio::profile::{by_category, Achievement, ACHIEVEMENTS, OWNER};
use leptos::prelude::*;

use crate::ui_model::{reveal_delay_ms, NavSection, HEADLINE_STATS, SOCIAL_LINKS};

mod background;
mod canvas;
mod chat;
mod console;

use background::ParticleBackground;
use chat::AiChat;

pub fn start() {
    console::init();
    tracing::info!(
        achievements = ACHIEVEMENTS.len(),
        groups = by_category(ACHIEVEMENTS).len(),
        "mounting portfolio"
    );
    mount_to_body(|| view! { <App /> });
}

#[component]
fn App() -> impl IntoView {
    view! {
        <div class="page">
            <ParticleBackground />
            <AiChat />
            <NavBar />
            <Hero />
            <Manifesto />
            <Projects />
            <Footer />
        </div>
    }
}

#[component]
fn NavBar() -> impl IntoView {
    view! {
        <nav class="nav">
            <div class="nav-inner">
                <div class="nav-brand">
                    <div class="nav-logo">"N"</div>
                    <span class="nav-tag">"Architect_Yu"</span>
                </div>
                <div class="nav-links">
                    {NavSection::all()
                        .iter()
                        .map(|s| view! { <a href=s.href()>{s.label()}</a> })
                        .collect_view()}
                </div>
            </div>
        </nav>
    }
}

#[component]
fn Hero() -> impl IntoView {
    view! {
        <section class="hero">
            <div class="hero-badge">"Logic & Perception"</div>
            <h1 class="hero-name">{OWNER.name}</h1>
            <div class="hero-latin">"NIU YUWEN"</div>
            <p class="hero-lede">
                {format!("{} · 实战派创业者", OWNER.location)}
                <span class="hero-sub">"Architecting AI commercial infrastructure"</span>
            </p>
            <a class="hero-cta" href=NavSection::Projects.href()>
                "EXPLORE ARCHIVES →"
            </a>
        </section>
    }
}

#[component]
fn Manifesto() -> impl IntoView {
    view! {
        <section id=NavSection::Manifesto.anchor() class="manifesto">
            <div class="manifesto-copy">
                <h2>"将 AI 注入" <br /> <span class="accent">"真实增长"</span></h2>
                <p>{OWNER.bio}</p>
                <div class="stats">
                    {HEADLINE_STATS
                        .iter()
                        .map(|s| {
                            view! {
                                <div class="stat">
                                    <div class="stat-value">{s.value}</div>
                                    <div class="stat-label">{s.label}</div>
                                </div>
                            }
                        })
                        .collect_view()}
                </div>
            </div>
            <div class="manifesto-card">
                <h3>"XI'AN DISTRICT"</h3>
                <p>{OWNER.motto}</p>
            </div>
        </section>
    }
}

#[component]
fn Projects() -> impl IntoView {
    view! {
        <section id=NavSection::Projects.anchor() class="projects">
            <div class="section-kicker">"Archive_Log"</div>
            <h2>"历程与实践"</h2>
            <div class="achievement-grid">
                {ACHIEVEMENTS
                    .iter()
                    .enumerate()
                    .map(|(i, a)| view! { <AchievementCard achievement=*a index=i /> })
                    .collect_view()}
            </div>
        </section>
    }
}

#[component]
fn AchievementCard(achievement: Achievement, index: usize) -> impl IntoView {
    let category = achievement.category;
    let style = format!("transition-delay: {}ms;", reveal_delay_ms(index));
    view! {
        <div class=format!("achievement-card {}", category.accent()) style=style>
            <div class="achievement-icon">{category.icon()}</div>
            <h4>{achievement.title}</h4>
            <div class="achievement-footer">
                <span class="achievement-category">{category.label()}</span>
            </div>
        </div>
    }
}

#[component]
fn Footer() -> impl IntoView {
    view! {
        <footer id=NavSection::Connect.anchor() class="footer">
            <h2>"BEYOND THE " <span class="accent">"ALGO"</span></h2>
            <div class="social-links">
                {SOCIAL_LINKS
                    .iter()
                    .map(|label| view! { <a href="#">{*label}</a> })
                    .collect_view()}
            </div>
            <p class="colophon">"NIU YUWEN ARCHIVE © 2024 / ALL SYSTEMS NORMAL"</p>
        </footer>
    }
}
