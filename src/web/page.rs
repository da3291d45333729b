//! Dashboard HTML page.

const TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="es">
<head>
  <meta charset="utf-8">
  <title>Papel y cartón vs. Internet</title>
  <script src="https://cdn.plot.ly/plotly-2.35.2.min.js"></script>
  <style>
    body { font-family: sans-serif; margin: 2rem; }
    #error { color: #b00; }
    #chart { width: 100%; height: 650px; }
  </style>
</head>
<body>
  <h1>Demanda per cápita de papel y cartón vs. Uso de Internet</h1>
  <label for="country">País:</label>
  <select id="country">
    <option value="">-- Todos --</option>
__OPTIONS__
  </select>
  <a id="snapshot" href="/plot.png">PNG</a>
  <p id="error"></p>
  <div id="chart"></div>
  <script>
    const select = document.getElementById('country');
    const error = document.getElementById('error');
    const snapshot = document.getElementById('snapshot');

    async function draw(country) {
      error.textContent = '';
      snapshot.href = '/plot.png?country=' + encodeURIComponent(country);
      const res = await fetch('/plot', {
        method: 'POST',
        headers: { 'Content-Type': 'application/json' },
        body: JSON.stringify({ country: country }),
      });
      const body = await res.json();
      if (!res.ok) {
        error.textContent = body.error;
        return;
      }
      Plotly.react('chart', body.data, body.layout);
    }

    select.addEventListener('change', () => draw(select.value));
    draw(select.value);
  </script>
</body>
</html>
"#;

/// Render the page with one `<option>` per country.
pub fn render(countries: &[String]) -> String {
    let options: Vec<String> = countries
        .iter()
        .map(|c| {
            let c = escape(c);
            format!("    <option value=\"{c}\">{c}</option>")
        })
        .collect();
    TEMPLATE.replace("__OPTIONS__", &options.join("\n"))
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_countries_in_order() {
        let html = render(&["Chile".to_string(), "Peru".to_string()]);
        let chile = html.find(r#"<option value="Chile">Chile</option>"#).unwrap();
        let peru = html.find(r#"<option value="Peru">Peru</option>"#).unwrap();
        assert!(chile < peru);
        assert!(!html.contains("__OPTIONS__"));
    }

    #[test]
    fn escapes_names() {
        let html = render(&["Trinidad & <Tobago>".to_string()]);
        assert!(html.contains("Trinidad &amp; &lt;Tobago&gt;"));
        assert!(!html.contains("<Tobago>"));
    }

    #[test]
    fn empty_selector_still_renders() {
        let html = render(&[]);
        assert!(html.contains(r#"<select id="country">"#));
        assert!(html.contains("-- Todos --"));
    }
}
