use crate::models::DashboardStats;

pub fn render_index(stats: &DashboardStats) -> String {
    INDEX_HTML
        .replace("{{ACTIVE}}", &stats.active_count.to_string())
        .replace("{{EXPIRED}}", &stats.expired_count.to_string())
        .replace("{{PENDING}}", &stats.pending_or_other_count.to_string())
        .replace("{{REVENUE}}", &format!("{:.2}", stats.total_revenue))
        .replace("{{CHECK_INS}}", &stats.today_check_ins.to_string())
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Gym Desk</title>
  <style>
    :root {
      --bg: #f4f5f9;
      --ink: #1f2430;
      --muted: #6b7080;
      --card: #ffffff;
      --green: #10b981;
      --red: #ef4444;
      --amber: #f59e0b;
      --blue: #2563eb;
      --indigo: #4f46e5;
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg);
      color: var(--ink);
      font-family: "Inter", "Segoe UI", sans-serif;
      padding: 32px 18px;
    }

    .app {
      width: min(960px, 100%);
      margin: 0 auto;
      display: grid;
      gap: 24px;
    }

    h1 {
      margin: 0;
      font-size: 1.8rem;
    }

    .kpis {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(170px, 1fr));
      gap: 16px;
    }

    .kpi {
      background: var(--card);
      border-radius: 14px;
      border: 1px solid rgba(31, 36, 48, 0.08);
      padding: 20px;
      display: grid;
      gap: 6px;
    }

    .kpi .label {
      font-size: 0.85rem;
      color: var(--muted);
    }

    .kpi .value {
      font-size: 1.9rem;
      font-weight: 700;
    }

    .active { color: var(--green); }
    .expired { color: var(--red); }
    .pending { color: var(--amber); }
    .revenue { color: var(--blue); }
    .check-ins { color: var(--indigo); }

    .hint {
      margin: 0;
      color: var(--muted);
      font-size: 0.9rem;
    }
  </style>
</head>
<body>
  <main class="app">
    <h1>Admin dashboard</h1>

    <section class="kpis">
      <div class="kpi">
        <span class="label">Active members</span>
        <span class="value active">{{ACTIVE}}</span>
      </div>
      <div class="kpi">
        <span class="label">Expired memberships</span>
        <span class="value expired">{{EXPIRED}}</span>
      </div>
      <div class="kpi">
        <span class="label">Pending / other</span>
        <span class="value pending">{{PENDING}}</span>
      </div>
      <div class="kpi">
        <span class="label">Total income</span>
        <span class="value revenue">{{REVENUE}}</span>
      </div>
      <div class="kpi">
        <span class="label">Check-ins today</span>
        <span class="value check-ins">{{CHECK_INS}}</span>
      </div>
    </section>

    <p class="hint">Total income is the sum of every payment recorded. Member, payment, attendance and routine data is served as JSON under /api.</p>
  </main>
</body>
</html>
"#;
