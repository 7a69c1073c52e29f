//! The single-page browser UI.
//!
//! Talks to the JSON API in `routes`; all state lives server-side in the
//! session's workbench, the page only mirrors the latest snapshot.

pub const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<title>DataPlotter</title>
<style>
  * { box-sizing: border-box; }
  body { margin: 0; font-family: system-ui, sans-serif; background: #f6f7f9; color: #1f2430; }
  header { padding: 16px 24px; background: #fff; border-bottom: 1px solid #e2e5ea; }
  header h1 { margin: 0; font-size: 22px; }
  header p { margin: 4px 0 0; color: #5b6270; }
  main { display: grid; grid-template-columns: 300px 1fr; gap: 16px; padding: 16px 24px; }
  aside, section { background: #fff; border: 1px solid #e2e5ea; border-radius: 8px; padding: 12px 16px; }
  aside h2, section h2 { font-size: 15px; margin: 12px 0 8px; }
  label { display: block; font-size: 13px; margin: 8px 0 2px; color: #424856; }
  input, select, button { width: 100%; padding: 5px 6px; font: inherit; font-size: 13px; }
  input[type=checkbox] { width: auto; }
  button { cursor: pointer; background: #1f77b4; color: #fff; border: 0; border-radius: 4px; padding: 7px; margin-top: 10px; }
  .banner { padding: 8px 12px; border-radius: 6px; margin: 8px 0; font-size: 14px; }
  .info { background: #e8f1fb; color: #184a7a; }
  .success { background: #e6f5ea; color: #1d5a2c; }
  .warning { background: #fff6dd; color: #6b5100; }
  .error { background: #fdeaea; color: #8a1c1c; }
  .hidden { display: none; }
  table { border-collapse: collapse; width: 100%; font-size: 13px; }
  th, td { border-bottom: 1px solid #eceef2; padding: 4px 8px; text-align: left; white-space: nowrap; }
  th { cursor: pointer; background: #fafbfc; position: sticky; top: 0; }
  th small { color: #8a909c; font-weight: normal; }
  .table-wrap { max-height: 420px; overflow: auto; }
  .pager { display: flex; gap: 8px; align-items: center; margin-top: 6px; font-size: 13px; }
  .pager button { width: auto; margin: 0; padding: 4px 10px; }
  #chart { width: 100%; min-height: 200px; overflow: hidden; cursor: grab; user-select: none; }
  #chart svg { width: 100%; height: auto; display: block; }
</style>
</head>
<body>
<header>
  <h1>DataPlotter</h1>
  <p>Upload your data and visualize it in 2D and 3D.</p>
</header>
<main>
  <aside>
    <h2>1. Import</h2>
    <label for="file">CSV or TXT file</label>
    <input id="file" type="file" accept=".csv,.txt">
    <label for="delimiter">Delimiter (<code>\t</code> for tab)</label>
    <input id="delimiter" type="text" value=",">
    <label for="skip_rows">Rows to skip</label>
    <input id="skip_rows" type="number" min="0" value="0">
    <label for="header">Header row</label>
    <select id="header"></select>

    <div id="chart-controls" class="hidden">
      <h2>2. Axis mapping</h2>
      <label for="kind">Chart type</label>
      <select id="kind"></select>
      <label for="x">X axis</label>
      <select id="x"></select>
      <label for="y">Y axis</label>
      <select id="y"></select>
      <div id="z-row"><label for="z">Z axis</label><select id="z"></select></div>
      <label for="color">Color (optional)</label>
      <select id="color"></select>

      <h2>3. Customize</h2>
      <label for="title">Chart title</label>
      <input id="title" type="text">
      <label for="x_label">X axis label</label>
      <input id="x_label" type="text">
      <label for="y_label">Y axis label</label>
      <input id="y_label" type="text">
      <div id="z-label-row"><label for="z_label">Z axis label</label><input id="z_label" type="text"></div>
      <label><input id="legend" type="checkbox" checked> Show legend</label>

      <div id="export-controls" class="hidden">
        <h2>4. Export</h2>
        <label for="format">Format</label>
        <select id="format"></select>
        <label for="export_name">File name</label>
        <input id="export_name" type="text">
        <button id="export">Export</button>
      </div>
    </div>
  </aside>

  <div>
    <div id="import-status" class="banner"></div>
    <section id="data-section" class="hidden">
      <details open>
        <summary><strong>Data preview</strong> <span id="table-summary"></span></summary>
        <div id="hints"></div>
        <div class="table-wrap"><table><thead id="thead"></thead><tbody id="tbody"></tbody></table></div>
        <div class="pager">
          <button id="prev">&lsaquo;</button>
          <span id="position"></span>
          <button id="next">&rsaquo;</button>
        </div>
      </details>
    </section>
    <section id="chart-section" class="hidden">
      <h2>Chart builder</h2>
      <div id="chart-status" class="banner hidden"></div>
      <div id="chart" title="Scroll to zoom, drag to pan, double-click to reset"></div>
    </section>
  </div>
</main>
<script>
const $ = (id) => document.getElementById(id);
let state = null;
let pageStart = 0;
let sort = null;
let heldFile = null;
let currentChart = null;

function banner(el, status) {
  if (!status) { el.className = 'banner hidden'; return; }
  el.className = 'banner ' + status.variant;
  el.textContent = status.message;
}

function fillSelect(el, options, selected) {
  el.innerHTML = '';
  for (const [value, label] of options) {
    const opt = document.createElement('option');
    opt.value = value;
    opt.textContent = label;
    if (value === selected) opt.selected = true;
    el.appendChild(opt);
  }
}

async function api(path, init) {
  const res = await fetch(path, init);
  const body = await res.json();
  if (!res.ok && body.error) throw new Error(body.error);
  return body;
}

function applySnapshot(snap) {
  state = snap;
  banner($('import-status'), snap.import_status);
  fillSelect($('header'), snap.header_modes.map(m => [m.value, m.label]), snap.options.header_mode);
  $('delimiter').value = snap.options.delimiter;
  $('skip_rows').value = snap.options.skip_rows;

  const loaded = !!snap.table;
  $('data-section').classList.toggle('hidden', !loaded);
  $('chart-section').classList.toggle('hidden', !loaded);
  $('chart-controls').classList.toggle('hidden', !loaded);
  if (!loaded) { $('chart').innerHTML = ''; return; }

  $('table-summary').textContent = '(' + snap.table.file_name + ', ' + snap.table.rows_label + ')';
  const hints = $('hints');
  hints.innerHTML = '';
  for (const hint of snap.hints) {
    const div = document.createElement('div');
    banner(div, hint);
    hints.appendChild(div);
  }

  const columns = snap.table.columns.map(c => [c.name, c.name]);
  fillSelect($('kind'), snap.chart_kinds.map(k => [k.value, k.label]), snap.chart && snap.chart.kind);
  fillSelect($('format'), snap.export_formats.map(f => [f, f]), 'png');
  if (snap.chart) {
    const m = snap.chart.mapping;
    fillSelect($('x'), columns, m.x);
    fillSelect($('y'), columns, m.y);
    fillSelect($('z'), columns, m.z);
    fillSelect($('color'), [['', '(none)']].concat(columns), m.color || '');
    $('title').value = snap.chart.title || '';
    $('legend').checked = snap.chart.show_legend;
  }
  applyChart({ chart: snap.chart, status: snap.chart_status, svg: snap.svg });
  pageStart = 0;
  sort = null;
  loadPage();
}

function applyChart(update) {
  banner($('chart-status'), update.status);
  const chart = update.chart;
  currentChart = chart;
  const is3d = chart && (chart.kind === 'scatter3d' || chart.kind === 'surface3d');
  $('z-row').classList.toggle('hidden', !is3d);
  $('z-label-row').classList.toggle('hidden', !is3d);
  if (chart) {
    $('x_label').placeholder = chart.mapping.x;
    $('y_label').placeholder = chart.mapping.y;
    $('z_label').placeholder = chart.mapping.z || 'Z';
    $('title').placeholder = chart.mapping.y + ' vs ' + chart.mapping.x;
    if (chart.mapping.z) $('z').value = chart.mapping.z;
  }
  $('chart').innerHTML = update.svg || '';
  $('export-controls').classList.toggle('hidden', !update.svg);
  const title = ($('title').value || $('title').placeholder || 'chart').replace(/ /g, '_');
  $('export_name').placeholder = title;
  resetView();
}

async function importFile() {
  if (!heldFile) return;
  const params = new URLSearchParams({
    name: heldFile.name,
    delimiter: $('delimiter').value,
    skip_rows: $('skip_rows').value || '0',
    header: $('header').value || 'infer',
  });
  const res = await fetch('/api/import?' + params, { method: 'POST', body: heldFile });
  applySnapshot(await res.json());
}

async function loadPage() {
  const params = new URLSearchParams({ start: pageStart });
  if (sort) { params.set('sort', sort.col); params.set('dir', sort.dir); }
  else params.set('dir', 'none');
  try {
    const page = await api('/api/table?' + params);
    renderPage(page);
  } catch (e) {
    $('position').textContent = e.message;
  }
}

function renderPage(page) {
  const head = document.createElement('tr');
  page.columns.forEach((c, i) => {
    const th = document.createElement('th');
    let arrow = '';
    if (sort && sort.col === i) arrow = sort.dir === 'asc' ? ' ▲' : ' ▼';
    th.textContent = c.name + arrow + ' ';
    const kind = document.createElement('small');
    kind.textContent = c.kind;
    th.appendChild(kind);
    th.onclick = () => cycleSort(i);
    head.appendChild(th);
  });
  $('thead').replaceChildren(head);

  const rows = page.rows.map(r => {
    const tr = document.createElement('tr');
    for (const cell of r) {
      const td = document.createElement('td');
      td.textContent = cell;
      tr.appendChild(td);
    }
    return tr;
  });
  $('tbody').replaceChildren(...rows);
  $('position').textContent = page.position;
  $('prev').disabled = page.start === 0;
  $('next').disabled = page.start + page.rows.length >= page.total;
  $('next').dataset.step = page.rows.length || 1;
}

function cycleSort(col) {
  if (!sort || sort.col !== col) sort = { col, dir: 'asc' };
  else if (sort.dir === 'asc') sort.dir = 'desc';
  else sort = null;
  pageStart = 0;
  loadPage();
}

function currentSpec() {
  const kind = $('kind').value;
  const is3d = kind === 'scatter3d' || kind === 'surface3d';
  // The z picker only holds a real choice once a 3D chart has mapped it
  const zChosen = is3d && currentChart && currentChart.mapping.z;
  return {
    kind,
    mapping: {
      x: $('x').value,
      y: $('y').value,
      z: zChosen ? ($('z').value || null) : null,
      color: $('color').value || null,
    },
    title: $('title').value,
    axis_labels: { x: $('x_label').value, y: $('y_label').value, z: $('z_label').value },
    show_legend: $('legend').checked,
  };
}

async function updateChart() {
  try {
    const update = await api('/api/chart', { method: 'POST', body: JSON.stringify(currentSpec()) });
    applyChart(update);
  } catch (e) {
    banner($('chart-status'), { variant: 'error', message: e.message });
  }
}

// Pan and zoom by rewriting the SVG viewBox
let view = null;
let drag = null;
function chartSvg() { return $('chart').querySelector('svg'); }
function resetView() {
  const svg = chartSvg();
  if (!svg) { view = null; return; }
  const w = parseFloat(svg.getAttribute('width'));
  const h = parseFloat(svg.getAttribute('height'));
  view = { x: 0, y: 0, w, h, w0: w, h0: h };
  svg.setAttribute('viewBox', `0 0 ${w} ${h}`);
  svg.removeAttribute('width');
  svg.removeAttribute('height');
}
function applyView() {
  const svg = chartSvg();
  if (svg && view) svg.setAttribute('viewBox', `${view.x} ${view.y} ${view.w} ${view.h}`);
}
$('chart').addEventListener('wheel', (e) => {
  if (!view) return;
  e.preventDefault();
  const rect = $('chart').getBoundingClientRect();
  const fx = (e.clientX - rect.left) / rect.width;
  const fy = (e.clientY - rect.top) / rect.height;
  const factor = e.deltaY < 0 ? 0.9 : 1 / 0.9;
  const nw = Math.min(view.w0, view.w * factor);
  const nh = Math.min(view.h0, view.h * factor);
  view.x += (view.w - nw) * fx;
  view.y += (view.h - nh) * fy;
  view.w = nw;
  view.h = nh;
  applyView();
}, { passive: false });
$('chart').addEventListener('mousedown', (e) => { if (view) drag = { x: e.clientX, y: e.clientY }; });
window.addEventListener('mouseup', () => { drag = null; });
window.addEventListener('mousemove', (e) => {
  if (!drag || !view) return;
  const rect = $('chart').getBoundingClientRect();
  view.x -= (e.clientX - drag.x) * view.w / rect.width;
  view.y -= (e.clientY - drag.y) * view.h / rect.height;
  drag = { x: e.clientX, y: e.clientY };
  applyView();
});
$('chart').addEventListener('dblclick', resetView);

$('file').addEventListener('change', (e) => { heldFile = e.target.files[0] || null; importFile(); });
for (const id of ['delimiter', 'skip_rows', 'header']) $(id).addEventListener('change', importFile);
for (const id of ['kind', 'x', 'y', 'z', 'color', 'title', 'x_label', 'y_label', 'z_label', 'legend']) {
  $(id).addEventListener('change', updateChart);
}
$('prev').addEventListener('click', () => {
  pageStart = Math.max(0, pageStart - Number($('next').dataset.step || 50));
  loadPage();
});
$('next').addEventListener('click', () => {
  pageStart += Number($('next').dataset.step || 50);
  loadPage();
});
$('export').addEventListener('click', () => {
  const params = new URLSearchParams({ format: $('format').value, name: $('export_name').value });
  window.location = '/api/export?' + params;
});

api('/api/state').then(applySnapshot);
</script>
</body>
</html>
"##;
