//! Model, form, view, url and page skeletons for one entity.

use super::{capitalize, fill};
use crate::models::{EntityNames, FieldKind, FieldSpec};

pub const MODELS_HEADER: &str = "from django.db import models\n";
pub const FORMS_IMPORT: &str = "from django import forms";
pub const URLS_IMPORT: &str = "from django.urls import path";
pub const VIEWS_IMPORT: &str = "from . import views";
pub const REVERSE_LAZY_IMPORT: &str = "from django.urls import reverse_lazy";
pub const GENERIC_VIEWS_IMPORT: &str =
    "from django.views.generic import ListView, DetailView, CreateView, UpdateView, DeleteView";

/// Fields used when the user adds none
pub fn default_fields() -> Vec<FieldSpec> {
    vec![
        FieldSpec::new("description", FieldKind::String { max_length: 200 }),
        FieldSpec::new("created_at", FieldKind::DateTime),
    ]
}

/// Field that best represents an instance in `__str__`
fn display_field(fields: &[FieldSpec]) -> Option<&FieldSpec> {
    ["name", "title", "nom", "label", "description"]
        .iter()
        .find_map(|candidate| fields.iter().find(|f| f.name == *candidate))
}

/// Complete model class, preceded by two blank lines
pub fn model_block(names: &EntityNames, fields: &[FieldSpec]) -> String {
    let mut block = format!("\n\nclass {}(models.Model):\n", names.class);
    for field in fields {
        block.push_str(&field.render());
        block.push('\n');
    }
    block.push_str("\n    def __str__(self):\n");
    match display_field(fields) {
        Some(field) => block.push_str(&format!("        return str(self.{})\n", field.name)),
        None => block.push_str(&format!(
            "        return f'{} object ({{self.pk}})'\n",
            names.class
        )),
    }
    block
}

pub fn models_import(names: &EntityNames) -> String {
    format!("from .models import {}", names.class)
}

pub fn form_class(names: &EntityNames) -> String {
    fill(
        r#"

class {{MODEL}}Form(forms.ModelForm):
    class Meta:
        model = {{MODEL}}
        fields = '__all__'
"#,
        &[("MODEL", names.class.as_str())],
    )
}

pub fn forms_module(names: &EntityNames) -> String {
    format!(
        "{}\n{}\n{}",
        FORMS_IMPORT,
        models_import(names),
        form_class(names)
    )
}

pub fn forms_import(names: &EntityNames) -> String {
    format!("from .forms import {}Form", names.class)
}

pub fn view_classes(app: &str, names: &EntityNames) -> String {
    fill(
        r#"

class {{MODEL}}ListView(ListView):
    model = {{MODEL}}
    template_name = '{{APP}}/{{LOWER}}_list.html'
    context_object_name = '{{PLURAL}}'


class {{MODEL}}DetailView(DetailView):
    model = {{MODEL}}
    template_name = '{{APP}}/{{LOWER}}_detail.html'


class {{MODEL}}CreateView(CreateView):
    model = {{MODEL}}
    form_class = {{MODEL}}Form
    template_name = '{{APP}}/{{LOWER}}_form.html'
    success_url = reverse_lazy('{{APP}}:{{LOWER}}_list')


class {{MODEL}}UpdateView(UpdateView):
    model = {{MODEL}}
    form_class = {{MODEL}}Form
    template_name = '{{APP}}/{{LOWER}}_form.html'
    success_url = reverse_lazy('{{APP}}:{{LOWER}}_list')


class {{MODEL}}DeleteView(DeleteView):
    model = {{MODEL}}
    template_name = '{{APP}}/{{LOWER}}_confirm_delete.html'
    success_url = reverse_lazy('{{APP}}:{{LOWER}}_list')
"#,
        &entity_vars(app, names),
    )
}

/// Import lines a views module needs for [`view_classes`], in file order
pub fn views_imports(names: &EntityNames) -> Vec<String> {
    vec![
        REVERSE_LAZY_IMPORT.to_string(),
        GENERIC_VIEWS_IMPORT.to_string(),
        models_import(names),
        forms_import(names),
    ]
}

pub fn views_module(app: &str, names: &EntityNames) -> String {
    let mut module = String::from("from django.shortcuts import render\n");
    for import in views_imports(names) {
        module.push_str(&import);
        module.push('\n');
    }
    module.push_str(&view_classes(app, names));
    module
}

/// The five CRUD routes, one `path(...)` per line, indented for a list body
pub fn url_lines(names: &EntityNames) -> Vec<String> {
    let l = &names.lower;
    let c = &names.class;
    vec![
        format!("    path('{l}/', views.{c}ListView.as_view(), name='{l}_list'),"),
        format!("    path('{l}/<int:pk>/', views.{c}DetailView.as_view(), name='{l}_detail'),"),
        format!("    path('{l}/create/', views.{c}CreateView.as_view(), name='{l}_create'),"),
        format!("    path('{l}/<int:pk>/update/', views.{c}UpdateView.as_view(), name='{l}_update'),"),
        format!("    path('{l}/<int:pk>/delete/', views.{c}DeleteView.as_view(), name='{l}_delete'),"),
    ]
}

/// Text whose presence means the routes were already generated
pub fn url_presence(names: &EntityNames) -> String {
    format!("name='{}_list'", names.lower)
}

pub fn urls_module(app: &str, names: &EntityNames) -> String {
    format!(
        "{}\n{}\n\napp_name = '{}'\n\nurlpatterns = [\n{}\n]\n",
        URLS_IMPORT,
        VIEWS_IMPORT,
        app,
        url_lines(names).join("\n")
    )
}

/// Line mounting an app's url table in the project urls module
pub fn include_line(app: &str, prefix: &str) -> String {
    format!("    path('{}', include('{}.urls')),", prefix, app)
}

fn entity_vars<'a>(app: &'a str, names: &'a EntityNames) -> [(&'static str, &'a str); 4] {
    [
        ("MODEL", names.class.as_str()),
        ("APP", app),
        ("LOWER", names.lower.as_str()),
        ("PLURAL", names.plural.as_str()),
    ]
}

const PAGE_HEAD: &str = r#"<!DOCTYPE html>
<html>
<head>
    <title>{{TITLE}}</title>
    <link href="https://cdn.jsdelivr.net/npm/bootstrap@5.3.0/dist/css/bootstrap.min.css" rel="stylesheet">
</head>
<body class="container mt-4">
"#;

const PAGE_FOOT: &str = "</body>\n</html>\n";

const LIST_BODY: &str = r#"    <h1>{{MODEL}} List</h1>
    <a href="{% url '{{APP}}:{{LOWER}}_create' %}" class="btn btn-primary mb-3">Create New</a>
    <table class="table table-striped">
        <thead>
            <tr>
                <th>ID</th>
{{HEADERS}}                <th>Actions</th>
            </tr>
        </thead>
        <tbody>
            {% for item in {{PLURAL}} %}
            <tr>
                <td>{{ item.id }}</td>
{{CELLS}}                <td>
                    <a href="{% url '{{APP}}:{{LOWER}}_detail' item.pk %}" class="btn btn-sm btn-info">View</a>
                    <a href="{% url '{{APP}}:{{LOWER}}_update' item.pk %}" class="btn btn-sm btn-warning">Edit</a>
                    <a href="{% url '{{APP}}:{{LOWER}}_delete' item.pk %}" class="btn btn-sm btn-danger">Delete</a>
                </td>
            </tr>
            {% empty %}
            <tr><td colspan="{{COLSPAN}}">No {{LOWER}} yet.</td></tr>
            {% endfor %}
        </tbody>
    </table>
"#;

const DETAIL_BODY: &str = r#"    <h1>{{MODEL}} Details</h1>
    <ul>
        <li><strong>ID:</strong> {{ object.pk }}</li>
{{ITEMS}}    </ul>
    <a href="{% url '{{APP}}:{{LOWER}}_update' object.pk %}" class="btn btn-warning">Edit</a>
    <a href="{% url '{{APP}}:{{LOWER}}_list' %}" class="btn btn-secondary">Back</a>
"#;

const FORM_BODY: &str = r#"    <h1>{% if object %}Update{% else %}Create{% endif %} {{MODEL}}</h1>
    <form method="post" enctype="multipart/form-data">
        {% csrf_token %}
        {{ form.as_p }}
        <button type="submit" class="btn btn-success">Save</button>
        <a href="{% url '{{APP}}:{{LOWER}}_list' %}" class="btn btn-secondary">Cancel</a>
    </form>
"#;

const DELETE_BODY: &str = r#"    <h1>Delete {{MODEL}}?</h1>
    <p>Are you sure you want to delete "{{ object }}"?</p>
    <form method="post">
        {% csrf_token %}
        <button type="submit" class="btn btn-danger">Confirm Delete</button>
        <a href="{% url '{{APP}}:{{LOWER}}_list' %}" class="btn btn-secondary">Cancel</a>
    </form>
"#;

fn page(title: &str, body: &str, vars: &[(&str, &str)]) -> String {
    let mut html = fill(PAGE_HEAD, &[("TITLE", title)]);
    html.push_str(&fill(body, vars));
    html.push_str(PAGE_FOOT);
    html
}

/// The four CRUD pages as `(file name, content)`.
///
/// `fields` lists the model's columns; when empty the pages show the object's
/// string form instead.
pub fn pages(app: &str, names: &EntityNames, fields: &[String]) -> Vec<(String, String)> {
    let (headers, cells, items): (String, String, String) = if fields.is_empty() {
        (
            "                <th>Description</th>\n".to_string(),
            "                <td>{{ item }}</td>\n".to_string(),
            "        <li>{{ object }}</li>\n".to_string(),
        )
    } else {
        let headers = fields
            .iter()
            .map(|f| format!("                <th>{}</th>\n", capitalize(f)))
            .collect();
        let cells = fields
            .iter()
            .map(|f| format!("                <td>{{{{ item.{} }}}}</td>\n", f))
            .collect();
        let items = fields
            .iter()
            .map(|f| format!("        <li><strong>{}:</strong> {{{{ object.{} }}}}</li>\n", capitalize(f), f))
            .collect();
        (headers, cells, items)
    };
    let colspan = (fields.len().max(1) + 2).to_string();

    let base = entity_vars(app, names);
    let mut vars: Vec<(&str, &str)> = base.to_vec();
    vars.push(("HEADERS", headers.as_str()));
    vars.push(("CELLS", cells.as_str()));
    vars.push(("ITEMS", items.as_str()));
    vars.push(("COLSPAN", colspan.as_str()));

    let l = &names.lower;
    vec![
        (format!("{l}_list.html"), page(&format!("{} List", names.class), LIST_BODY, &vars)),
        (format!("{l}_detail.html"), page(&format!("{} Detail", names.class), DETAIL_BODY, &vars)),
        (format!("{l}_form.html"), page(&format!("{} Form", names.class), FORM_BODY, &vars)),
        (format!("{l}_confirm_delete.html"), page("Confirm Delete", DELETE_BODY, &vars)),
    ]
}
