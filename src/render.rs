// src/render.rs
//! Server-rendered pages. Plain HTML forms drive every state change; inline
//! scripts only run the decorative timers and the clipboard helper.

use crate::{
    effects::Effects,
    link::ShareLink,
    page::{Locale, PageState},
};

const HAPPY_GIF: &str = "https://media.giphy.com/media/26u4cqiYI30juCOGY/giphy.gif";
const ASKING_GIF: &str = "https://media.giphy.com/media/3o7aCTPPm4OHfRLSH6/giphy.gif";
const CONFETTI_JS: &str =
    "https://cdn.jsdelivr.net/npm/canvas-confetti@1.9.3/dist/confetti.browser.min.js";

pub fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn document(lang: &str, title: &str, body: &str, effects: &Effects) -> String {
    let mut html = String::with_capacity(8192);
    html.push_str("<!DOCTYPE html>\n<html lang=\"");
    html.push_str(lang);
    html.push_str("\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n<title>");
    html.push_str(&escape(title));
    html.push_str("</title>\n");
    html.push_str(STYLE);
    html.push_str("</head>\n<body>\n");
    html.push_str(body);
    if !effects.is_empty() {
        if effects.confetti.is_some() {
            html.push_str(&format!("<script src=\"{CONFETTI_JS}\"></script>\n"));
        }
        // `</` inside the JSON would end the script element early
        let json = serde_json::to_string(&effects.plan())
            .unwrap_or_else(|_| "{}".to_string())
            .replace("</", "<\\/");
        html.push_str("<script id=\"effects\" type=\"application/json\">");
        html.push_str(&json);
        html.push_str("</script>\n");
        html.push_str(EFFECTS_SCRIPT);
    }
    html.push_str("</body>\n</html>\n");
    html
}

pub fn not_found(locale: Locale) -> String {
    let body = format!(
        r#"<main class="page">
<div class="stack">
<div class="emoji">💔</div>
<h1 class="huge">404</h1>
<h2>{title}</h2>
<p class="muted">{text}</p>
<a class="btn btn-red" href="/">{back}</a>
</div>
</main>
"#,
        title = escape(locale.not_found_title()),
        text = escape(locale.not_found_body()),
        back = escape(locale.back_home()),
    );
    document(locale.lang(), "404", &body, &Effects::default())
}

/// One view of the landing state machine. `effects` carries the question
/// view's decorative timers; the accepted view only runs confetti.
pub fn landing(state: &PageState, locale: Locale, effects: Effects) -> String {
    match state {
        PageState::NotFound => not_found(locale),
        PageState::Accepted { .. } => accepted(locale, Effects::default().with_confetti()),
        PageState::Loading { name } => question(state, name, locale, effects.revealing()),
        PageState::Pending { name, .. } => question(state, name, locale, effects),
    }
}

fn accepted(locale: Locale, effects: Effects) -> String {
    let body = format!(
        r#"<main class="page">
<div class="stack">
<div class="emoji bounce">❤️</div>
<img class="gif" src="{HAPPY_GIF}" alt="Happy GIF">
<h2 class="big">{title}</h2>
<p class="big">{line}</p>
</div>
</main>
"#,
        title = escape(locale.accepted_title()),
        line = escape(locale.accepted_line()),
    );
    document(locale.lang(), locale.accepted_title(), &body, &effects)
}

fn question(state: &PageState, name: &str, locale: Locale, effects: Effects) -> String {
    let question = locale.question(name);
    // loading shows a placeholder until the reveal timer fires
    let (heading_class, placeholder_class) = if effects.reveal_after_ms.is_some() {
        ("hidden", "pulse")
    } else {
        ("", "hidden")
    };
    let body = format!(
        r#"<main class="page">
<div id="floating-hearts" class="floating-hearts"></div>
<div class="stack front">
<h1 class="title">
<span id="loading" class="{placeholder_class}">{loading}</span>
<span id="question" class="{heading_class}">{question}</span>
</h1>
<img class="gif" src="{ASKING_GIF}" alt="Valentine GIF">
<form method="post" class="choices">
<input type="hidden" name="no_clicks" value="{clicks}">
<button class="btn btn-green" name="choice" value="yes" style="transform: scale({scale:.2}); max-width: 45%">{yes}</button>
<button class="btn btn-red" name="choice" value="no">{no}</button>
</form>
</div>
</main>
"#,
        loading = escape(locale.loading()),
        question = escape(&question),
        clicks = state.no_clicks(),
        scale = state.yes_button_scale(),
        yes = escape(locale.yes()),
        no = escape(locale.no_phrase(state.no_clicks())),
    );
    document(locale.lang(), &question, &body, &effects)
}

/// What the admin page shows after a submission.
#[derive(Debug, Default)]
pub struct AdminView {
    pub name: String,
    pub link: Option<ShareLink>,
    pub empty_name: bool,
}

pub fn admin(view: &AdminView) -> String {
    let mut body = String::with_capacity(4096);
    body.push_str(&format!(
        r#"<main class="page">
<div class="card">
<h1 class="center">Админ Панел - Генериране на URL</h1>
<form method="post" action="/admin" class="stack-left">
<label for="name-input">Въведете име (на английски или български):</label>
<input id="name-input" name="name" type="text" value="{name}" placeholder="Например: Христо, Maria, Иван..." autofocus>
<button class="btn btn-red wide" type="submit">Генерирай URL</button>
</form>
"#,
        name = escape(&view.name),
    ));

    if let Some(link) = &view.link {
        body.push_str(&format!(
            r#"<div class="stack-left">
<label for="generated-url">Генериран URL:</label>
<div class="row">
<input id="generated-url" type="text" value="{url}" readonly>
<button id="copy" class="btn btn-red" type="button">Копирай</button>
</div>
<div class="note">
<p><strong>Инструкции:</strong></p>
<ul>
<li>Копирайте URL адреса по-горе</li>
<li>Споделете го с желаното лице</li>
<li>Когато отворят линка, тяхното име ще се покаже автоматично</li>
</ul>
</div>
<div class="center"><a class="btn btn-green" href="{url}" target="_blank" rel="noopener noreferrer">Отвори в нов прозорец</a></div>
</div>
"#,
            url = escape(&link.url),
        ));
    }

    body.push_str(
        r#"<div class="footer"><a href="/">← Назад към главната страница</a></div>
</div>
</main>
"#,
    );
    body.push_str(COPY_SCRIPT);
    if view.empty_name {
        body.push_str("<script>alert('Моля, въведете име!');</script>\n");
    }

    document("bg", "Админ Панел", &body, &Effects::default())
}

const STYLE: &str = r#"<style>
*{box-sizing:border-box}
body{margin:0;font-family:system-ui,-apple-system,"Segoe UI",Roboto,sans-serif;background:#fff5f5;color:#b91c1c}
.page{display:flex;min-height:100dvh;align-items:center;justify-content:center;padding:0 1rem;position:relative;overflow:hidden}
.stack{display:flex;flex-direction:column;align-items:center;gap:1.5rem;text-align:center;max-width:28rem;width:100%}
.stack-left{display:flex;flex-direction:column;gap:1rem;margin-top:1.5rem}
.front{z-index:10}
.card{width:100%;max-width:42rem;background:#fff;border-radius:.5rem;box-shadow:0 10px 15px rgba(0,0,0,.1);padding:2rem}
.center{text-align:center}
.row{display:flex;gap:.5rem}
.emoji{font-size:6rem}
.huge{font-size:3.75rem;margin:0}
.big{font-size:2.25rem;font-weight:700;margin:0}
.title{font-size:2rem;line-height:1.25;margin:0}
.muted{opacity:.8;font-size:1.125rem}
.hidden{display:none}
.pulse{opacity:.7;animation:pulse 1.5s ease-in-out infinite}
.bounce{animation:bounce 1s infinite}
.gif{width:16rem;height:16rem;object-fit:contain}
.choices{display:flex;gap:1rem;width:100%;justify-content:center;align-items:center}
.btn{display:inline-block;padding:.75rem 1.5rem;border:0;border-radius:.5rem;color:#fff;font-weight:700;font-size:1.125rem;text-decoration:none;cursor:pointer;transition:all .2s;transform-origin:center}
.btn-red{background:#b91c1c}.btn-red:hover{background:#991b1b}
.btn-green{background:#16a34a}.btn-green:hover{background:#15803d}
.wide{width:100%}
label{font-weight:600;font-size:1.125rem}
input[type=text]{flex:1;width:100%;padding:.75rem 1rem;border:2px solid #b91c1c;border-radius:.5rem;font-size:1.125rem}
input[readonly]{border-color:#d1d5db;background:#f9fafb;font-size:.875rem}
.note{background:#fdf2f8;border:2px solid #fbcfe8;border-radius:.5rem;padding:1rem;color:#374151;font-size:.875rem}
.footer{margin-top:2rem;padding-top:1.5rem;border-top:1px solid #e5e7eb}
.footer a{color:#b91c1c;font-weight:600;text-decoration:none}
.floating-hearts{position:fixed;inset:0;pointer-events:none;overflow:hidden}
.heart{position:absolute;bottom:-3rem;font-size:1.75rem;animation-name:float-up;animation-timing-function:linear;animation-fill-mode:both}
@keyframes float-up{from{transform:translate(0,0) rotate(0)}to{transform:translate(var(--drift),-110vh) rotate(var(--rotation))}}
@keyframes pulse{50%{opacity:.35}}
@keyframes bounce{0%,100%{transform:translateY(-25%)}50%{transform:none}}
</style>
"#;

const EFFECTS_SCRIPT: &str = r##"<script>
(function(){
  var cfg=JSON.parse(document.getElementById('effects').textContent);
  var timeouts=[],intervals=[];
  function later(fn,ms){
    var id=setTimeout(function(){
      var i=timeouts.indexOf(id);
      if(i>=0)timeouts.splice(i,1);
      fn();
    },ms);
    timeouts.push(id);
  }
  function every(fn,ms){intervals.push(setInterval(fn,ms))}
  function rand(min,max){return Math.random()*(max-min)+min}

  if(cfg.reveal_after_ms!=null){
    later(function(){
      document.getElementById('loading').classList.add('hidden');
      document.getElementById('question').classList.remove('hidden');
    },cfg.reveal_after_ms);
  }

  var h=cfg.hearts,box=document.getElementById('floating-hearts');
  if(h&&box){
    var spawn=function(){
      if(box.childElementCount>=h.max_alive)return;
      var el=document.createElement('div');
      var duration=rand(h.min_duration_s,h.max_duration_s),delay=rand(0,h.max_delay_s);
      el.className='heart';
      el.textContent=h.glyphs[Math.floor(Math.random()*h.glyphs.length)];
      el.style.left=rand(0,100)+'%';
      el.style.animationDuration=duration+'s';
      el.style.animationDelay=delay+'s';
      el.style.setProperty('--drift',rand(-h.max_drift_px/2,h.max_drift_px/2)+'px');
      el.style.setProperty('--rotation',rand(0,360)+'deg');
      box.appendChild(el);
      later(function(){el.remove()},(duration+delay)*1000);
    };
    h.initial_offsets_ms.forEach(function(ms){later(spawn,ms)});
    every(spawn,h.interval_ms);
  }

  var c=cfg.confetti;
  if(c&&window.confetti){
    var defaults={startVelocity:c.start_velocity,spread:c.spread,ticks:c.particle_ticks,zIndex:0};
    c.bursts.forEach(function(b){
      later(function(){
        confetti(Object.assign({},defaults,{particleCount:b.particles,origin:{x:rand(c.left_x[0],c.left_x[1]),y:Math.random()-0.2}}));
        confetti(Object.assign({},defaults,{particleCount:b.particles,origin:{x:rand(c.right_x[0],c.right_x[1]),y:Math.random()-0.2}}));
      },b.at_ms);
    });
  }

  window.addEventListener('pagehide',function(){
    timeouts.forEach(clearTimeout);
    intervals.forEach(clearInterval);
    timeouts=[];
    intervals=[];
  });
})();
</script>
"##;

const COPY_SCRIPT: &str = r##"<script>
(function(){
  var button=document.getElementById('copy'),field=document.getElementById('generated-url');
  if(!button||!field)return;
  var revert=null;
  function copied(){
    button.textContent='✓ Копирано!';
    button.classList.remove('btn-red');
    button.classList.add('btn-green');
    clearTimeout(revert);
    revert=setTimeout(function(){
      button.textContent='Копирай';
      button.classList.remove('btn-green');
      button.classList.add('btn-red');
    },2000);
  }
  function fallback(text){
    var area=document.createElement('textarea');
    area.value=text;
    area.style.position='fixed';
    area.style.opacity='0';
    document.body.appendChild(area);
    area.select();
    try{
      if(!document.execCommand('copy'))throw new Error('copy rejected');
      copied();
    }catch(e){
      alert('Неуспешно копиране. Моля, копирайте ръчно.');
    }
    document.body.removeChild(area);
  }
  button.addEventListener('click',function(){
    var text=field.value;
    if(!text)return;
    if(navigator.clipboard&&navigator.clipboard.writeText){
      navigator.clipboard.writeText(text).then(copied,function(err){
        console.error('Failed to copy:',err);
        fallback(text);
      });
    }else{
      fallback(text);
    }
  });
  window.addEventListener('pagehide',function(){clearTimeout(revert)});
})();
</script>
"##;
