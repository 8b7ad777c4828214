//! Inline dashboard page served at `/`.

/// Single-page chore board: lists chores with urgency badges and a
/// "mark done" button per chore. Talks to `/api/chores` only.
pub const DASHBOARD_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>ChoreWheel</title>
<style>
  body { font-family: system-ui, sans-serif; max-width: 640px; margin: 2rem auto; padding: 0 1rem; background: #f7f7f5; color: #222; }
  h1 { font-size: 1.5rem; }
  .chore { background: #fff; border-radius: 8px; padding: 1rem; margin: 0.75rem 0; display: flex; justify-content: space-between; align-items: center; box-shadow: 0 1px 3px rgba(0,0,0,.08); }
  .badge { display: inline-block; font-size: .75rem; padding: .15rem .5rem; border-radius: 999px; background: #e8f0e8; margin-right: .35rem; }
  .badge--danger { background: #f6d5d5; }
  .badge--warning { background: #f8ecd0; }
  button { border: 0; background: #2f6f4f; color: #fff; border-radius: 6px; padding: .5rem .9rem; cursor: pointer; }
  #banner { min-height: 1.25rem; font-size: .85rem; color: #555; }
</style>
</head>
<body>
<h1>ChoreWheel</h1>
<div id="banner"></div>
<div id="chore-list"></div>
<button id="refresh">Refresh</button>
<script>
const list = document.getElementById("chore-list");
const banner = document.getElementById("banner");
document.getElementById("refresh").addEventListener("click", loadChores);

function urgency(chore) {
  if (chore.isOverdue) return ["badge badge--danger", "overdue"];
  if (chore.isDueSoon) return ["badge badge--warning", "due soon"];
  return ["badge", "on track"];
}

function render(chores) {
  list.innerHTML = "";
  for (const chore of chores) {
    const [cls, label] = urgency(chore);
    const card = document.createElement("div");
    card.className = "chore";
    card.innerHTML = `<div><strong>${chore.name}</strong><br>
      <span class="badge">${chore.assignedTo.name}</span>
      <span class="badge">every ${chore.frequencyDays}d</span>
      <span class="${cls}">${label}</span></div>`;
    const button = document.createElement("button");
    button.textContent = "Mark done & swap";
    button.onclick = async () => {
      const resp = await fetch(`/api/chores/${chore.id}`, { method: "POST" });
      banner.textContent = resp.ok ? `${chore.name} handed off.` : "Completion failed.";
      loadChores();
    };
    card.appendChild(button);
    list.appendChild(card);
  }
}

async function loadChores() {
  const resp = await fetch("/api/chores");
  if (!resp.ok) { banner.textContent = "Failed to load chores."; return; }
  const data = await resp.json();
  render(data.chores);
}

loadChores();
</script>
</body>
</html>
"#;
