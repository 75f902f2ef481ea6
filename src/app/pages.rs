use axum::response::Html;

const NAV: &str = r#"<nav class="nav"><a href="/"><h1 class="logo">BoostFy</h1></a></nav>"#;

const STYLE: &str = r#"<style>
body { font-family: sans-serif; margin: 0; background: #f6f7fb; color: #1d1d35; }
.nav { display: flex; align-items: center; padding: 0 2rem; background: #1d1d35; }
.nav a { color: #fff; text-decoration: none; }
.content { max-width: 40rem; margin: 2rem auto; padding: 0 1rem; }
.field { margin-bottom: 1rem; }
.field label { display: block; font-weight: bold; }
.field input { width: 100%; padding: .5rem; box-sizing: border-box; }
.error { color: #b00020; font-size: .9rem; min-height: 1rem; }
.notice { padding: 1rem; border-radius: .5rem; display: none; }
.notice.ok { display: block; background: #e3f7e9; }
.notice.fail { display: block; background: #fde7ea; }
.start_btn { padding: .75rem 1.5rem; background: #5b3df5; color: #fff; border: 0; border-radius: .5rem; text-decoration: none; }
</style>"#;

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"pt-BR\">\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n{}\n</head>\n<body>\n{}\n{}\n</body>\n</html>\n",
        title, STYLE, NAV, body
    )
}

const LANDING_BODY: &str = r#"<div class="content">
  <h3>Seja Bem-Vindo(a)!</h3>
  <h1>BoostFy</h1>
  <p>Impulsione seu negócio com a BoostFy. Comece agora!</p>
  <a class="start_btn" href="/form">Começar</a>
</div>"#;

const FORM_BODY: &str = r#"<div class="content">
  <h1>Vamos Impulsionar Seu Negócio Juntos</h1>
  <div id="notice" class="notice"></div>
  <form id="onboarding" action="/api/submissions" method="post" enctype="multipart/form-data" novalidate>
    <h3>Informações da empresa</h3>
    <div class="field">
      <label for="company_name">Nome da empresa:</label>
      <input type="text" name="company_name" id="company_name">
      <div class="error" data-for="company_name"></div>
    </div>
    <div class="field">
      <label for="cnpj">CNPJ:</label>
      <input type="text" name="cnpj" id="cnpj" placeholder="00.000.000/0000-00">
      <div class="error" data-for="cnpj"></div>
    </div>
    <div class="field">
      <label for="website">Web Site:</label>
      <input type="text" name="website" id="website">
      <div class="error" data-for="website"></div>
    </div>
    <div class="field">
      <label for="sector">Setor/Área de atuação:</label>
      <input type="text" name="sector" id="sector">
      <div class="error" data-for="sector"></div>
    </div>
    <div class="field">
      <label for="employees">Número de Funcionários:</label>
      <input type="number" min="0" name="employees" id="employees">
      <div class="error" data-for="employees"></div>
    </div>
    <div class="field">
      <label for="attachment">Anexo:</label>
      <input type="file" name="attachment" id="attachment">
    </div>
    <button class="start_btn" type="submit">Enviar</button>
  </form>
</div>
<script>
const form = document.getElementById('onboarding');
const notice = document.getElementById('notice');
const cnpj = document.getElementById('cnpj');

function showErrors(fields) {
  document.querySelectorAll('.error').forEach(e => { e.textContent = ''; });
  (fields || []).forEach(f => {
    const slot = document.querySelector('.error[data-for="' + f.field + '"]');
    if (slot) slot.textContent = f.message;
  });
}

cnpj.addEventListener('blur', async () => {
  if (!cnpj.value) return;
  const res = await fetch('/api/cnpj/validate', {
    method: 'POST',
    headers: { 'Content-Type': 'application/json' },
    body: JSON.stringify({ cnpj: cnpj.value })
  });
  const check = await res.json();
  const slot = document.querySelector('.error[data-for="cnpj"]');
  slot.textContent = check.valid ? '' : 'CNPJ inválido';
  if (check.valid) cnpj.value = check.formatted;
});

form.addEventListener('submit', async (e) => {
  e.preventDefault();
  notice.className = 'notice';
  const res = await fetch(form.action, { method: 'POST', body: new FormData(form) });
  const body = await res.json();
  if (res.ok) {
    showErrors([]);
    form.reset();
    notice.className = 'notice ok';
    notice.textContent = 'Formulário enviado! Seu formulário foi enviado com sucesso. Obrigado por nos escolher!';
  } else {
    showErrors(body.error.code === 'payload_too_large'
      ? [{ field: 'attachment', message: body.error.message }]
      : body.error.fields);
    notice.className = 'notice fail';
    notice.textContent = body.error.message;
  }
});
</script>"#;

pub async fn landing_handler() -> Html<String> {
    Html(layout("BoostFy", LANDING_BODY))
}

pub async fn form_handler() -> Html<String> {
    Html(layout("BoostFy - Cadastro", FORM_BODY))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_form_page_has_every_field() {
        let Html(page) = form_handler().await;
        for field in ["company_name", "cnpj", "website", "sector", "employees", "attachment"] {
            assert!(page.contains(&format!("name=\"{}\"", field)), "missing {}", field);
        }
        assert!(page.contains("multipart/form-data"));
    }

    #[tokio::test]
    async fn test_landing_links_to_form() {
        let Html(page) = landing_handler().await;
        assert!(page.contains("href=\"/form\""));
    }
}
