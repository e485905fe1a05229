pub const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>SwarmMaster</title>
<style>
  body { background: #111827; color: #e5e7eb; font-family: system-ui, sans-serif; max-width: 960px; margin: 2rem auto; padding: 0 1rem; }
  #output { background: #1f2937; border-radius: 8px; min-height: 360px; padding: 1rem; white-space: pre-wrap; overflow-y: auto; max-height: 600px; }
  textarea, select, button { font: inherit; }
  textarea { width: 100%; background: #1f2937; color: inherit; border: 1px solid #374151; border-radius: 6px; padding: .5rem; }
  button { border: 0; border-radius: 6px; padding: .5rem 1rem; margin: .5rem .5rem 0 0; cursor: pointer; }
  .primary { background: #f59e0b; color: #111827; }
  .secondary { background: #374151; color: inherit; }
  .examples li { cursor: pointer; color: #93c5fd; }
  details { margin-top: 1rem; }
  label { display: block; margin-top: .5rem; }
</style>
</head>
<body>
<h1>🐝 SwarmMaster WebApp</h1>
<p>The ultimate multi-agent orchestrator, powered by you.</p>
<p>Configure your swarm below, then enter a task to deploy specialized agents.</p>

<div id="output" aria-label="Swarm Output">Your swarm results will appear here...</div>

<label for="task">Task</label>
<textarea id="task" rows="3" placeholder="Enter your task (e.g., 'Design a viral AI tool')"></textarea>
<button id="deploy" class="primary">Deploy Swarm 🚀</button>
<button id="clear" class="secondary">Clear</button>
<button id="export" class="secondary">📥 Export Results</button>

<details>
  <summary>⚙️ Advanced Settings</summary>
  <label>Model <select id="model"></select></label>
  <label>Temperature <output id="temperature-value"></output>
    <input id="temperature" type="range" min="0" max="2" step="0.1">
  </label>
  <label>Max Tokens <output id="max-tokens-value"></output>
    <input id="max-tokens" type="range" min="256" max="8192" step="256">
  </label>
</details>

<h3>Examples</h3>
<ul class="examples">
  <li>Redesign my dashboard to be visually stunning and engaging</li>
  <li>Create a complete business plan for an AI mentorship platform</li>
  <li>Build a production-ready multi-agent research system</li>
</ul>

<script>
const $ = (id) => document.getElementById(id);
const BANNER = "🚀 Deploying Builder Swarm...\n\n";
let lastResponse = "";

function bindRange(input, label) {
  const show = () => { label.textContent = input.value; };
  input.addEventListener("input", show);
  show();
}

async function loadModels() {
  const res = await fetch("/api/models");
  const cfg = await res.json();
  for (const id of cfg.models) {
    const opt = document.createElement("option");
    opt.value = id;
    opt.textContent = id;
    $("model").appendChild(opt);
  }
  $("model").value = cfg.default_model;
  $("temperature").value = cfg.default_temperature;
  $("max-tokens").value = cfg.default_max_tokens;
  bindRange($("temperature"), $("temperature-value"));
  bindRange($("max-tokens"), $("max-tokens-value"));
}

async function deploy() {
  $("output").textContent = "";
  lastResponse = "";
  const res = await fetch("/api/swarm", {
    method: "POST",
    headers: { "Content-Type": "application/json" },
    body: JSON.stringify({
      task: $("task").value,
      model: $("model").value,
      temperature: parseFloat($("temperature").value),
      max_tokens: parseInt($("max-tokens").value, 10),
    }),
  });
  const reader = res.body.getReader();
  const decoder = new TextDecoder();
  let buffer = "";
  let banner = "";
  for (;;) {
    const { value, done } = await reader.read();
    if (done) break;
    buffer += decoder.decode(value, { stream: true });
    let end;
    while ((end = buffer.indexOf("\n\n")) >= 0) {
      const frame = buffer.slice(0, end);
      buffer = buffer.slice(end + 2);
      if (!frame.startsWith("data: ")) continue;
      const line = JSON.parse(frame.slice(6));
      if (line === BANNER) {
        banner = line;
        $("output").textContent = banner;
      } else if (line.startsWith("❌")) {
        $("output").textContent = banner + lastResponse + (lastResponse ? "\n\n" : "") + line;
      } else {
        lastResponse = line;
        $("output").textContent = banner + line;
      }
    }
  }
}

function clearAll() {
  $("output").textContent = "";
  $("task").value = "";
  lastResponse = "";
}

async function exportResults() {
  const res = await fetch("/api/export", {
    method: "POST",
    headers: { "Content-Type": "application/json" },
    body: JSON.stringify({
      task: $("task").value,
      model: $("model").value,
      response: lastResponse,
      temperature: $("temperature").value,
      max_tokens: $("max-tokens").value,
    }),
  });
  const disposition = res.headers.get("Content-Disposition") || "";
  const match = disposition.match(/filename="([^"]+)"/);
  const blob = await res.blob();
  const link = document.createElement("a");
  link.href = URL.createObjectURL(blob);
  link.download = match ? match[1] : "swarmmaster_export.txt";
  link.click();
  URL.revokeObjectURL(link.href);
}

$("deploy").addEventListener("click", deploy);
$("clear").addEventListener("click", clearAll);
$("export").addEventListener("click", exportResults);
document.querySelectorAll(".examples li").forEach((li) =>
  li.addEventListener("click", () => { $("task").value = li.textContent; }));
loadModels();
</script>
</body>
</html>
"##;
