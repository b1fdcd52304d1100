// storefront/src/web/templates.rs

//! Template engine setup and the embedded HTML templates.

use once_cell::sync::Lazy;
use tera::{Context, Tera};

/// Global template engine instance with embedded templates.
pub static TEMPLATES: Lazy<Tera> = Lazy::new(|| {
  let mut tera = Tera::default();
  tera
    .add_raw_templates(vec![
      ("base.html", BASE_TEMPLATE),
      ("index.html", INDEX_TEMPLATE),
      ("contact.html", CONTACT_TEMPLATE),
      ("login.html", LOGIN_TEMPLATE),
      ("register.html", REGISTER_TEMPLATE),
      ("profile.html", PROFILE_TEMPLATE),
      ("password_change.html", PASSWORD_CHANGE_TEMPLATE),
      ("cart.html", CART_TEMPLATE),
      ("order.html", ORDER_TEMPLATE),
      ("error.html", ERROR_TEMPLATE),
      ("dashboard/products_list.html", DASHBOARD_PRODUCTS_TEMPLATE),
      ("dashboard/product_form.html", DASHBOARD_PRODUCT_FORM_TEMPLATE),
      ("dashboard/product_confirm_delete.html", DASHBOARD_PRODUCT_DELETE_TEMPLATE),
      ("dashboard/contacts_list.html", DASHBOARD_CONTACTS_TEMPLATE),
    ])
    .expect("Failed to load templates");
  tera
});

pub fn render(template: &str, context: &Context) -> Result<String, tera::Error> {
  TEMPLATES.render(template, context)
}

// =============================================================================
// Layout
// =============================================================================

const BASE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>{% block title %}Storefront{% endblock %}</title>
  <style>
    :root { --fg: #1d1d1f; --muted: #6e6e73; --border: #e5e5ea; --accent: #0a7d4f; --danger: #b42318; }
    * { box-sizing: border-box; }
    body { margin: 0; font-family: -apple-system, "Segoe UI", Helvetica, Arial, sans-serif; color: var(--fg); line-height: 1.5; }
    a { color: var(--accent); text-decoration: none; }
    header { border-bottom: 1px solid var(--border); padding: 16px 32px; display: flex; justify-content: space-between; align-items: center; }
    nav a { margin-left: 20px; color: var(--fg); }
    main { max-width: 1100px; margin: 0 auto; padding: 32px; }
    .flash { padding: 10px 14px; border-radius: 6px; margin-bottom: 20px; }
    .flash.success { background: #e7f6ee; color: var(--accent); }
    .flash.error { background: #fdecea; color: var(--danger); }
    .errorlist { color: var(--danger); font-size: 14px; margin: 4px 0 0; padding-left: 18px; }
    .grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(220px, 1fr)); gap: 24px; }
    .card { border: 1px solid var(--border); border-radius: 10px; padding: 16px; }
    .card img { width: 100%; height: 160px; object-fit: cover; border-radius: 6px; }
    .form-row { margin-bottom: 14px; }
    .form-row label { display: block; font-weight: 600; margin-bottom: 4px; }
    .form-control { width: 100%; padding: 8px 10px; border: 1px solid var(--border); border-radius: 6px; font: inherit; }
    .btn { display: inline-block; padding: 8px 16px; border-radius: 6px; border: 1px solid var(--accent); background: var(--accent); color: #fff; cursor: pointer; font: inherit; }
    .btn.secondary { background: #fff; color: var(--accent); }
    .btn.danger { background: var(--danger); border-color: var(--danger); }
    table { width: 100%; border-collapse: collapse; }
    th, td { text-align: left; padding: 8px; border-bottom: 1px solid var(--border); vertical-align: middle; }
    .muted { color: var(--muted); }
  </style>
</head>
<body>
  <header>
    <a href="/"><strong>Storefront</strong></a>
    <nav>
      <a href="/">Shop</a>
      <a href="/cart/">Cart</a>
      <a href="/contact/">Contact</a>
      {% if current_user %}
        {% if current_user.is_staff %}<a href="/dashboard/products/">Dashboard</a>{% endif %}
        <a href="/profile/">{{ current_user.username }}</a>
        <a href="/logout/">Log out</a>
      {% else %}
        <a href="/login/">Log in</a>
        <a href="/register/">Register</a>
      {% endif %}
    </nav>
  </header>
  <main>
    {% if message %}<div class="flash success">{{ message }}</div>{% endif %}
    {% if error %}<div class="flash error">{{ error }}</div>{% endif %}
    {% block content %}{% endblock %}
  </main>
  <script>
    async function cartRequest(url, payload) {
      const response = await fetch(url, {
        method: payload === undefined ? "GET" : "POST",
        headers: { "Content-Type": "application/json" },
        credentials: "same-origin",
        body: payload === undefined ? undefined : JSON.stringify(payload),
      });
      if (response.status === 401) { window.location = "/login/?next=" + encodeURIComponent(location.pathname); return null; }
      const body = await response.json();
      if (!response.ok) { alert(body.error || "Cart request failed."); return null; }
      return body;
    }
    async function addToCart(productId) {
      const cart = await cartRequest("/api/cart/get/");
      if (!cart) return;
      const line = cart.items.find((item) => item.product_id === productId);
      const updated = await cartRequest("/api/cart/update/", { product_id: productId, quantity: line ? line.quantity + 1 : 1 });
      if (updated) alert("Added to cart.");
    }
  </script>
  {% block scripts %}{% endblock %}
</body>
</html>
"##;

// =============================================================================
// Storefront pages
// =============================================================================

const INDEX_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block content %}
<h1>Products</h1>
{% if products %}
<div class="grid">
  {% for product in products %}
  <div class="card">
    {% if product.image_url %}<img src="{{ product.image_url }}" alt="{{ product.name }}">{% endif %}
    <h3>{{ product.name }}</h3>
    <p class="muted">{{ product.description | truncate(length=120) }}</p>
    <p><strong>${{ product.price_display }}</strong> {% if product.stock == 0 %}<span class="muted">(out of stock)</span>{% endif %}</p>
    <button class="btn" onclick="addToCart({{ product.id }})">Add to cart</button>
  </div>
  {% endfor %}
</div>
{% else %}
<p class="muted">No products available yet.</p>
{% endif %}
{% endblock %}
"##;

const CONTACT_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block title %}Contact | Storefront{% endblock %}
{% block content %}
<h1>Contact us</h1>
{% if errors["__all__"] %}<div class="flash error">{% for e in errors["__all__"] %}{{ e }} {% endfor %}</div>{% endif %}
<form method="post" action="/contact/">
  <div class="form-row"><label for="name">Name</label><input class="form-control" id="name" name="name" value="{{ form.name }}" maxlength="100"></div>
  <div class="form-row"><label for="email">Email</label><input class="form-control" id="email" name="email" type="email" value="{{ form.email }}">
    {% if errors.email %}<ul class="errorlist">{% for e in errors.email %}<li>{{ e }}</li>{% endfor %}</ul>{% endif %}</div>
  <div class="form-row"><label for="message">Message</label><textarea class="form-control" id="message" name="message" rows="5">{{ form.message }}</textarea></div>
  <button class="btn" type="submit">Send</button>
</form>
{% endblock %}
"##;

const LOGIN_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block title %}Log in | Storefront{% endblock %}
{% block content %}
<h1>Log in</h1>
{% if errors["__all__"] %}<div class="flash error">{% for e in errors["__all__"] %}{{ e }} {% endfor %}</div>{% endif %}
<form method="post" action="/login/">
  <input type="hidden" name="next" value="{{ form.next }}">
  <div class="form-row"><label for="username">Username</label><input class="form-control" id="username" name="username" value="{{ form.username }}" autofocus>
    {% if errors.username %}<ul class="errorlist">{% for e in errors.username %}<li>{{ e }}</li>{% endfor %}</ul>{% endif %}</div>
  <div class="form-row"><label for="password">Password</label><input class="form-control" id="password" name="password" type="password">
    {% if errors.password %}<ul class="errorlist">{% for e in errors.password %}<li>{{ e }}</li>{% endfor %}</ul>{% endif %}</div>
  <button class="btn" type="submit">Log in</button>
  <p class="muted">No account? <a href="/register/">Register</a></p>
</form>
{% endblock %}
"##;

const REGISTER_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block title %}Register | Storefront{% endblock %}
{% block content %}
<h1>Create an account</h1>
{% if errors["__all__"] %}<div class="flash error">{% for e in errors["__all__"] %}{{ e }} {% endfor %}</div>{% endif %}
<form method="post" action="/register/">
  <div class="form-row"><label for="username">Username</label><input class="form-control" id="username" name="username" value="{{ form.username }}" maxlength="150">
    {% if errors.username %}<ul class="errorlist">{% for e in errors.username %}<li>{{ e }}</li>{% endfor %}</ul>{% endif %}</div>
  <div class="form-row"><label for="email">Email</label><input class="form-control" id="email" name="email" type="email" value="{{ form.email }}">
    {% if errors.email %}<ul class="errorlist">{% for e in errors.email %}<li>{{ e }}</li>{% endfor %}</ul>{% endif %}</div>
  <div class="form-row"><label for="password1">Password</label><input class="form-control" id="password1" name="password1" type="password">
    {% if errors.password1 %}<ul class="errorlist">{% for e in errors.password1 %}<li>{{ e }}</li>{% endfor %}</ul>{% endif %}</div>
  <div class="form-row"><label for="password2">Password confirmation</label><input class="form-control" id="password2" name="password2" type="password">
    {% if errors.password2 %}<ul class="errorlist">{% for e in errors.password2 %}<li>{{ e }}</li>{% endfor %}</ul>{% endif %}</div>
  <button class="btn" type="submit">Register</button>
</form>
{% endblock %}
"##;

const PROFILE_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block title %}Profile | Storefront{% endblock %}
{% block content %}
<h1>{{ current_user.username }}</h1>
<p class="muted">Member since {{ joined }} &middot; {{ cart_count }} item(s) in cart</p>
{% if errors["__all__"] %}<div class="flash error">{% for e in errors["__all__"] %}{{ e }} {% endfor %}</div>{% endif %}
<form method="post" action="/profile/">
  <div class="form-row"><label for="username">Username</label><input class="form-control" id="username" name="username" value="{{ form.username }}">
    {% if errors.username %}<ul class="errorlist">{% for e in errors.username %}<li>{{ e }}</li>{% endfor %}</ul>{% endif %}</div>
  <div class="form-row"><label for="email">Email</label><input class="form-control" id="email" name="email" type="email" value="{{ form.email }}">
    {% if errors.email %}<ul class="errorlist">{% for e in errors.email %}<li>{{ e }}</li>{% endfor %}</ul>{% endif %}</div>
  <div class="form-row"><label for="first_name">First name</label><input class="form-control" id="first_name" name="first_name" value="{{ form.first_name }}"></div>
  <div class="form-row"><label for="last_name">Last name</label><input class="form-control" id="last_name" name="last_name" value="{{ form.last_name }}"></div>
  <button class="btn" type="submit">Save</button>
  <a class="btn secondary" href="/profile/password/">Change password</a>
</form>
{% endblock %}
"##;

const PASSWORD_CHANGE_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block title %}Change password | Storefront{% endblock %}
{% block content %}
<h1>Change password</h1>
<form method="post" action="/profile/password/">
  <div class="form-row"><label for="old_password">Old password</label><input class="form-control" id="old_password" name="old_password" type="password">
    {% if errors.old_password %}<ul class="errorlist">{% for e in errors.old_password %}<li>{{ e }}</li>{% endfor %}</ul>{% endif %}</div>
  <div class="form-row"><label for="new_password1">New password</label><input class="form-control" id="new_password1" name="new_password1" type="password">
    {% if errors.new_password1 %}<ul class="errorlist">{% for e in errors.new_password1 %}<li>{{ e }}</li>{% endfor %}</ul>{% endif %}</div>
  <div class="form-row"><label for="new_password2">New password confirmation</label><input class="form-control" id="new_password2" name="new_password2" type="password">
    {% if errors.new_password2 %}<ul class="errorlist">{% for e in errors.new_password2 %}<li>{{ e }}</li>{% endfor %}</ul>{% endif %}</div>
  <button class="btn" type="submit">Change password</button>
</form>
{% endblock %}
"##;

const CART_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block title %}Cart | Storefront{% endblock %}
{% block content %}
<h1>Your cart</h1>
{% if current_user %}
<table id="cart-table">
  <thead><tr><th></th><th>Product</th><th>Price</th><th>Quantity</th><th></th></tr></thead>
  <tbody></tbody>
</table>
<p><strong>Total: $<span id="cart-total">0.00</span></strong></p>
<button class="btn secondary" onclick="clearCart()">Clear cart</button>
<a class="btn" href="/order/">Review order</a>
{% else %}
<p>Please <a href="/login/?next=/cart/">log in</a> to see your cart.</p>
{% endif %}
{% endblock %}
{% block scripts %}
{% if current_user %}
<script>
  function cell(row) { const td = document.createElement("td"); row.appendChild(td); return td; }
  function renderCart(cart) {
    const body = document.querySelector("#cart-table tbody");
    body.replaceChildren();
    for (const item of cart.items) {
      const row = document.createElement("tr");
      const productId = Number(item.product_id);
      const imageCell = cell(row);
      if (typeof item.image_url === "string" && item.image_url) {
        const img = document.createElement("img");
        img.src = item.image_url;
        img.width = 48;
        img.height = 48;
        imageCell.appendChild(img);
      }
      cell(row).textContent = String(item.name);
      cell(row).textContent = "$" + Number(item.price).toFixed(2);
      const input = document.createElement("input");
      input.type = "number";
      input.min = "0";
      input.value = String(Number(item.quantity));
      input.className = "form-control";
      input.style.width = "90px";
      input.addEventListener("change", (e) => updateItem(productId, parseInt(e.target.value, 10)));
      cell(row).appendChild(input);
      const remove = document.createElement("button");
      remove.className = "btn danger";
      remove.textContent = "Remove";
      remove.addEventListener("click", () => updateItem(productId, 0));
      cell(row).appendChild(remove);
      body.appendChild(row);
    }
    document.getElementById("cart-total").textContent = Number(cart.total).toFixed(2);
  }
  async function loadCart() { const cart = await cartRequest("/api/cart/get/"); if (cart) renderCart(cart); }
  async function updateItem(productId, quantity) {
    if (Number.isNaN(quantity)) return;
    const cart = await cartRequest("/api/cart/update/", { product_id: productId, quantity: quantity });
    if (cart) renderCart(cart);
  }
  async function clearCart() { const cart = await cartRequest("/api/cart/clear/", {}); if (cart) renderCart(cart); }

  const scheme = location.protocol === "https:" ? "wss" : "ws";
  const socket = new WebSocket(`${scheme}://${location.host}/ws/cart/{{ cart_room }}/`);
  socket.onmessage = (message) => {
    const event = JSON.parse(message.data);
    if (event.type === "cart_update" && event.data && Array.isArray(event.data.items)) renderCart(event.data);
    else loadCart();
  };
  loadCart();
</script>
{% endif %}
{% endblock %}
"##;

const ORDER_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block title %}Order | Storefront{% endblock %}
{% block content %}
<h1>Order summary</h1>
{% if lines %}
<table>
  <thead><tr><th>Product</th><th>Price</th><th>Quantity</th><th>Subtotal</th></tr></thead>
  <tbody>
  {% for line in lines %}
    <tr><td>{{ line.name }}</td><td>${{ line.price }}</td><td>{{ line.quantity }}</td><td>${{ line.subtotal }}</td></tr>
  {% endfor %}
  </tbody>
</table>
<p><strong>Total: ${{ total }}</strong></p>
{% else %}
<p class="muted">Your cart is empty. <a href="/">Continue shopping</a></p>
{% endif %}
{% endblock %}
"##;

const ERROR_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block title %}{{ status }} | Storefront{% endblock %}
{% block content %}
<h1>{{ status }}</h1>
<p>{{ detail }}</p>
<p><a href="/">Back to the shop</a></p>
{% endblock %}
"##;

// =============================================================================
// Staff dashboard
// =============================================================================

const DASHBOARD_PRODUCTS_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block title %}Products | Dashboard{% endblock %}
{% block content %}
<h1>Products</h1>
<form method="get" action="/dashboard/products/" style="display:flex; gap:12px; margin-bottom:20px">
  <input class="form-control" name="q" value="{{ q }}" placeholder="Search by name">
  <select class="form-control" name="active" style="width:160px">
    <option value="" {% if active == "" %}selected{% endif %}>All</option>
    <option value="yes" {% if active == "yes" %}selected{% endif %}>Active</option>
    <option value="no" {% if active == "no" %}selected{% endif %}>Inactive</option>
  </select>
  <button class="btn secondary" type="submit">Filter</button>
</form>
<p>
  <a class="btn" href="/dashboard/products/add/">Add product</a>
  <a class="btn secondary" href="/dashboard/products/export/pdf/">Export PDF</a>
  <a class="btn secondary" href="/dashboard/contacts/">Contact messages</a>
</p>
<table>
  <thead><tr><th>Image</th><th>Name</th><th>Price</th><th>Stock</th><th>Active</th><th>Created</th><th></th></tr></thead>
  <tbody>
  {% if not products %}
    <tr><td colspan="7" class="muted">No products found.</td></tr>
  {% endif %}
  {% for product in products %}
    <tr>
      <td>{% if product.image_url %}<img src="{{ product.image_url }}" width="48" height="48" style="object-fit:cover;border-radius:4px">{% else %}&mdash;{% endif %}</td>
      <td>{{ product.name }}</td>
      <td>${{ product.price_display }}</td>
      <td>{{ product.stock }}</td>
      <td>{% if product.is_active %}Yes{% else %}No{% endif %}</td>
      <td>{{ product.created_at }}</td>
      <td><a href="/dashboard/products/{{ product.id }}/edit/">Edit</a> &middot; <a href="/dashboard/products/{{ product.id }}/delete/">Delete</a></td>
    </tr>
  {% endfor %}
  </tbody>
</table>
{% endblock %}
"##;

const DASHBOARD_PRODUCT_FORM_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block title %}{{ action }} product | Dashboard{% endblock %}
{% block content %}
<h1>{{ action }} product</h1>
<form method="post" enctype="multipart/form-data">
  <div class="form-row"><label for="name">Name</label><input class="form-control" id="name" name="name" value="{{ form.name }}" maxlength="200">
    {% if errors.name %}<ul class="errorlist">{% for e in errors.name %}<li>{{ e }}</li>{% endfor %}</ul>{% endif %}</div>
  <div class="form-row"><label for="description">Description</label><textarea class="form-control" id="description" name="description" rows="4">{{ form.description }}</textarea></div>
  <div class="form-row"><label for="price">Price</label><input class="form-control" id="price" name="price" type="number" step="0.01" min="0" value="{{ form.price }}">
    {% if errors.price %}<ul class="errorlist">{% for e in errors.price %}<li>{{ e }}</li>{% endfor %}</ul>{% endif %}</div>
  <div class="form-row"><label for="stock">Stock</label><input class="form-control" id="stock" name="stock" type="number" min="0" value="{{ form.stock }}">
    {% if errors.stock %}<ul class="errorlist">{% for e in errors.stock %}<li>{{ e }}</li>{% endfor %}</ul>{% endif %}</div>
  <div class="form-row"><label><input type="checkbox" name="is_active" value="on" {% if form.is_active %}checked{% endif %}> Active</label></div>
  <div class="form-row"><label for="image">Image</label>
    {% if image_url %}<p><img src="{{ image_url }}" style="max-width:200px;border-radius:8px"><br>
      <label><input type="checkbox" name="image_clear" value="on"> Clear current image</label></p>{% endif %}
    <input class="form-control" id="image" name="image" type="file" accept="image/*">
    {% if errors.image %}<ul class="errorlist">{% for e in errors.image %}<li>{{ e }}</li>{% endfor %}</ul>{% endif %}</div>
  <button class="btn" type="submit">Save</button>
  <a class="btn secondary" href="/dashboard/products/">Cancel</a>
</form>
{% endblock %}
"##;

const DASHBOARD_PRODUCT_DELETE_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block title %}Delete product | Dashboard{% endblock %}
{% block content %}
<h1>Delete product</h1>
<p>Are you sure you want to delete <strong>{{ product.name }}</strong>? Cart lines holding it are removed too.</p>
<form method="post" action="/dashboard/products/{{ product.id }}/delete/">
  <button class="btn danger" type="submit">Yes, delete</button>
  <a class="btn secondary" href="/dashboard/products/">Cancel</a>
</form>
{% endblock %}
"##;

const DASHBOARD_CONTACTS_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block title %}Contact messages | Dashboard{% endblock %}
{% block content %}
<h1>Contact messages</h1>
<table>
  <thead><tr><th>Name</th><th>Email</th><th>Message</th><th>Received</th></tr></thead>
  <tbody>
  {% for contact in contacts %}
    <tr><td>{{ contact.name }}</td><td>{{ contact.email }}</td><td>{{ contact.message }}</td><td>{{ contact.created_at | date(format="%Y-%m-%d %H:%M") }}</td></tr>
  {% endfor %}
  {% if not contacts %}
    <tr><td colspan="4" class="muted">No messages yet.</td></tr>
  {% endif %}
  </tbody>
</table>
{% endblock %}
"##;
