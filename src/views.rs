use crate::formatter::FormattedQuote;
use crate::models::HistoryPoint;

const INDEX_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Bitcoin Price</title>
    <script src="https://cdn.jsdelivr.net/npm/chart.js"></script>
    <style>
        * { margin: 0; padding: 0; box-sizing: border-box; }

        body {
            font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif;
            background: linear-gradient(135deg, #f7931a 0%, #4d4d4d 100%);
            color: #333;
            min-height: 100vh;
        }

        .container { max-width: 1100px; margin: 0 auto; padding: 20px; }

        .header { text-align: center; margin-bottom: 30px; color: white; }
        .header h1 { font-size: 2.5rem; margin-bottom: 10px; }

        .grid {
            display: grid;
            grid-template-columns: repeat(auto-fit, minmax(200px, 1fr));
            gap: 20px;
            margin-bottom: 30px;
        }

        .card {
            background: white;
            border-radius: 15px;
            padding: 20px;
            box-shadow: 0 10px 30px rgba(0,0,0,0.1);
        }

        .card h3 { color: #f7931a; margin-bottom: 10px; }
        .price { font-size: 1.5rem; font-weight: bold; }
        .positive { color: #28a745; }
        .negative { color: #dc3545; }
        .chart { height: 400px; }
        .updated { text-align: center; color: white; margin-top: 20px; }
    </style>
</head>
<body>
    <div class="container">
        <div class="header">
            <h1>Bitcoin Price</h1>
        </div>

        <div class="grid">
{{CARDS}}
        </div>

        <div class="card chart">
            <h3>Last 30 days (USD)</h3>
            <canvas id="priceChart"></canvas>
        </div>

        <p class="updated">Last updated: {{LAST_UPDATED}}</p>
    </div>

    <script>
        const labels = {{CHART_LABELS}};
        const prices = {{CHART_PRICES}};

        new Chart(document.getElementById('priceChart').getContext('2d'), {
            type: 'line',
            data: {
                labels: labels,
                datasets: [{
                    label: 'BTC/USD',
                    data: prices,
                    borderColor: '#f7931a',
                    backgroundColor: 'rgba(247, 147, 26, 0.1)',
                    borderWidth: 2,
                    fill: true,
                    tension: 0.4
                }]
            },
            options: {
                responsive: true,
                maintainAspectRatio: false,
                plugins: { legend: { display: false } },
                scales: { y: { beginAtZero: false } }
            }
        });
    </script>
</body>
</html>
"#;

const ERROR_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Error</title>
    <style>
        body {
            font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif;
            background: #f8f9fa;
            display: flex;
            align-items: center;
            justify-content: center;
            min-height: 100vh;
        }
        .error {
            background: #f8d7da;
            color: #721c24;
            padding: 30px;
            border-radius: 8px;
            text-align: center;
        }
        a { color: #721c24; }
    </style>
</head>
<body>
    <div class="error">
        <h2>{{MESSAGE}}</h2>
        <p><a href="/">Back to the main page</a></p>
    </div>
</body>
</html>
"#;

pub fn render_index(cards: &[FormattedQuote], history: &[HistoryPoint], last_updated: &str) -> String {
    let cards_html: String = cards.iter().map(render_card).collect();
    let labels: Vec<String> = history.iter().map(HistoryPoint::label).collect();
    let prices: Vec<f64> = history.iter().map(|p| p.price).collect();

    INDEX_TEMPLATE
        .replace("{{CARDS}}", &cards_html)
        .replace("{{LAST_UPDATED}}", &escape_html(last_updated))
        .replace("{{CHART_LABELS}}", &to_js_array(&labels))
        .replace("{{CHART_PRICES}}", &to_js_array(&prices))
}

pub fn render_error(message: &str) -> String {
    ERROR_TEMPLATE.replace("{{MESSAGE}}", &escape_html(message))
}

fn render_card(card: &FormattedQuote) -> String {
    format!(
        r#"            <div class="card">
                <h3>{}</h3>
                <div class="price">{}</div>
                <div class="{}">{}</div>
            </div>
"#,
        escape_html(&card.label),
        escape_html(&card.price),
        card.change_class.as_str(),
        escape_html(&card.change_24h),
    )
}

fn to_js_array<T: serde::Serialize>(values: &[T]) -> String {
    serde_json::to_string(values).unwrap_or_else(|_| "[]".to_string())
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formatter::ChangeClass;
    use chrono::NaiveDate;

    #[test]
    fn index_contains_cards_and_chart_data() {
        let cards = vec![FormattedQuote {
            label: "USD".to_string(),
            price: "65,000.00".to_string(),
            change_24h: "0.00%".to_string(),
            change_class: ChangeClass::Negative,
        }];
        let history = vec![HistoryPoint {
            date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
            price: 45000.5,
        }];

        let html = render_index(&cards, &history, "2024-03-05 12:00:00");
        assert!(html.contains("<h3>USD</h3>"));
        assert!(html.contains(r#"<div class="negative">0.00%</div>"#));
        assert!(html.contains(r#"const labels = ["04.03"];"#));
        assert!(html.contains("const prices = [45000.5];"));
        assert!(html.contains("Last updated: 2024-03-05 12:00:00"));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn error_page_escapes_message() {
        let html = render_error("<b>oops</b>");
        assert!(html.contains("&lt;b&gt;oops&lt;/b&gt;"));
    }
}
