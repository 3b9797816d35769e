//! Artifacts of the authentication app: custom user model, signals, forms,
//! views, url table, pages, group bootstrap script and the setup guide.
//!
//! Every skeleton is parameterised by the app label through `{{APP}}`.

use super::{fill, replace_placeholders};
use crate::models::{AuthOptions, DefaultGroup};

pub const SMTP_MARKER: &str = "# SMTP settings";

/// Commented production mail settings appended to settings.py
pub const SMTP_BLOCK: &str = r#"
# SMTP settings (uncomment and configure for production)
# EMAIL_BACKEND = 'django.core.mail.backends.smtp.EmailBackend'
# EMAIL_HOST = 'smtp.gmail.com'
# EMAIL_PORT = 587
# EMAIL_USE_TLS = True
# EMAIL_HOST_USER = 'you@example.com'
# EMAIL_HOST_PASSWORD = 'app-password'
# DEFAULT_FROM_EMAIL = 'Site <you@example.com>'"#;

/// `(KEY, value)` settings the app relies on, appended when the key is unset
pub fn settings_entries(app: &str) -> Vec<(&'static str, String)> {
    vec![
        ("AUTH_USER_MODEL", format!("'{}.CustomUser'", app)),
        ("LOGIN_REDIRECT_URL", format!("'{}:dashboard'", app)),
        ("LOGOUT_REDIRECT_URL", format!("'{}:login'", app)),
        ("LOGIN_URL", format!("'{}:login'", app)),
        (
            "EMAIL_BACKEND",
            "'django.core.mail.backends.console.EmailBackend'".to_string(),
        ),
        ("DEFAULT_FROM_EMAIL", "'noreply@example.com'".to_string()),
    ]
}

pub const MODELS_MODULE: &str = r#"from django.contrib.auth.models import AbstractUser
from django.db import models


class CustomUser(AbstractUser):
    photo_profil = models.ImageField(upload_to='profiles/', null=True, blank=True)
    otp_code = models.CharField(max_length=6, blank=True, null=True)
    otp_created_at = models.DateTimeField(blank=True, null=True)

    def __str__(self):
        return self.username
"#;

const SIGNALS_MODULE: &str = r#"from django.contrib.auth.models import Group
from django.db.models.signals import post_save
from django.dispatch import receiver

from .models import CustomUser


@receiver(post_save, sender=CustomUser)
def assign_default_group(sender, instance, created, **kwargs):
    if created:
        group, _ = Group.objects.get_or_create(name='{{GROUP}}')
        instance.groups.add(group)
"#;

const WELCOME_EMAIL: &str = r#"
        from django.conf import settings
        from django.core.mail import send_mail

        subject = 'Welcome'
        message = f'Hello {instance.username}, thanks for signing up!'
        try:
            send_mail(subject, message, settings.DEFAULT_FROM_EMAIL, [instance.email])
        except Exception as e:
            print(f"Error sending email: {e}")
"#;

pub fn signals_module(options: &AuthOptions) -> String {
    let mut module = fill(SIGNALS_MODULE, &[("GROUP", options.default_group.group_name())]);
    if options.welcome_email {
        module.push_str(WELCOME_EMAIL);
    }
    module
}

/// `ready()` hook that imports the signal handlers
pub fn ready_method(app: &str) -> String {
    format!("\n    def ready(self):\n        import {}.signals  # noqa: F401", app)
}

pub const FORMS_MODULE: &str = r#"from django import forms
from django.contrib.auth.forms import UserCreationForm, UserChangeForm
from django.contrib.auth.models import Group, Permission

from .models import CustomUser


class CustomUserCreationForm(UserCreationForm):
    class Meta(UserCreationForm.Meta):
        model = CustomUser
        fields = UserCreationForm.Meta.fields + ('email', 'photo_profil',)


class CustomUserChangeForm(UserChangeForm):
    class Meta:
        model = CustomUser
        fields = ('username', 'email', 'photo_profil',)


class ProfileUpdateForm(forms.ModelForm):
    class Meta:
        model = CustomUser
        fields = ['username', 'email', 'photo_profil', 'first_name', 'last_name']


class UserAdminForm(forms.ModelForm):
    class Meta:
        model = CustomUser
        fields = ['username', 'email', 'first_name', 'last_name', 'groups', 'is_active', 'is_staff']
        widgets = {
            'groups': forms.CheckboxSelectMultiple(),
        }


class GroupForm(forms.ModelForm):
    permissions = forms.ModelMultipleChoiceField(
        queryset=Permission.objects.all(),
        widget=forms.CheckboxSelectMultiple(),
        required=False,
    )

    class Meta:
        model = Group
        fields = ['name', 'permissions']
"#;

const VIEWS_HEADER: &str = r#"from django.contrib import messages
from django.contrib.auth.mixins import LoginRequiredMixin, UserPassesTestMixin
from django.contrib.auth.models import Group
from django.shortcuts import redirect, render
from django.urls import reverse_lazy
from django.views.generic import CreateView, ListView, TemplateView, UpdateView

from .forms import CustomUserCreationForm, GroupForm, ProfileUpdateForm, UserAdminForm
from .models import CustomUser

ADMIN_GROUP = 'Admin_Site'
MANAGER_GROUP = 'Manager'
MEMBER_GROUP = 'Member'


def is_admin(user):
    return user.is_superuser or user.groups.filter(name=ADMIN_GROUP).exists()


def is_staff_member(user):
    return is_admin(user) or user.groups.filter(name=MANAGER_GROUP).exists()
"#;

const VIEWS_TWO_FACTOR: &str = r#"

import random

from django.contrib.auth import login as auth_login
from django.contrib.auth.views import LoginView
from django.core.mail import send_mail
from django.utils import timezone


class CustomLoginView(LoginView):
    template_name = '{{APP}}/login.html'

    def form_valid(self, form):
        user = form.get_user()
        otp = str(random.randint(100000, 999999))
        user.otp_code = otp
        user.otp_created_at = timezone.now()
        user.save()
        try:
            send_mail('Security code', f'Your code is: {otp}', None, [user.email], fail_silently=False)
        except Exception as e:
            messages.error(self.request, f"Email error: {e}")
            return super().form_invalid(form)
        self.request.session['pre_otp_user_id'] = user.id
        return redirect('{{APP}}:verify_otp')


def verify_otp(request):
    user_id = request.session.get('pre_otp_user_id')
    if not user_id:
        return redirect('{{APP}}:login')
    if request.method == 'POST':
        user = CustomUser.objects.filter(id=user_id).first()
        if user and user.otp_code == request.POST.get('otp'):
            auth_login(request, user)
            del request.session['pre_otp_user_id']
            return redirect('{{APP}}:dashboard')
        messages.error(request, "Invalid code.")
    return render(request, '{{APP}}/verify_otp.html')
"#;

const VIEWS_BODY: &str = r#"

class LandingView(TemplateView):
    template_name = '{{APP}}/landing.html'


class DashboardView(LoginRequiredMixin, TemplateView):
    template_name = '{{APP}}/dashboard.html'

    def get_context_data(self, **kwargs):
        context = super().get_context_data(**kwargs)
        user = self.request.user
        context['is_admin'] = is_admin(user)
        context['is_manager'] = user.groups.filter(name=MANAGER_GROUP).exists()
        context['is_member'] = user.groups.filter(name=MEMBER_GROUP).exists()
        return context


class UserManagementListView(LoginRequiredMixin, UserPassesTestMixin, ListView):
    model = CustomUser
    template_name = '{{APP}}/user_list.html'
    context_object_name = 'users'

    def test_func(self):
        return is_staff_member(self.request.user)


class ProfileUpdateView(LoginRequiredMixin, UpdateView):
    model = CustomUser
    form_class = ProfileUpdateForm
    template_name = '{{APP}}/profile.html'
    success_url = reverse_lazy('{{APP}}:dashboard')

    def get_object(self):
        return self.request.user


class UserUpdateView(LoginRequiredMixin, UserPassesTestMixin, UpdateView):
    model = CustomUser
    form_class = UserAdminForm
    template_name = '{{APP}}/user_form.html'
    success_url = reverse_lazy('{{APP}}:user_list')

    def test_func(self):
        return is_staff_member(self.request.user)


class UserDeleteView(LoginRequiredMixin, UserPassesTestMixin, TemplateView):
    template_name = '{{APP}}/user_confirm_delete.html'

    def test_func(self):
        return is_admin(self.request.user)

    def get_context_data(self, **kwargs):
        context = super().get_context_data(**kwargs)
        context['object'] = CustomUser.objects.get(pk=self.kwargs['pk'])
        return context

    def post(self, request, pk):
        user = CustomUser.objects.get(pk=pk)
        if user == request.user:
            messages.error(request, "You cannot delete your own account.")
        else:
            user.delete()
            messages.success(request, "User deleted.")
        return redirect('{{APP}}:user_list')


class GroupListView(LoginRequiredMixin, UserPassesTestMixin, ListView):
    model = Group
    template_name = '{{APP}}/group_list.html'
    context_object_name = 'groups'

    def test_func(self):
        return is_admin(self.request.user)


class GroupCreateView(LoginRequiredMixin, UserPassesTestMixin, CreateView):
    model = Group
    form_class = GroupForm
    template_name = '{{APP}}/group_form.html'
    success_url = reverse_lazy('{{APP}}:group_list')

    def test_func(self):
        return is_admin(self.request.user)


class GroupUpdateView(LoginRequiredMixin, UserPassesTestMixin, UpdateView):
    model = Group
    form_class = GroupForm
    template_name = '{{APP}}/group_form.html'
    success_url = reverse_lazy('{{APP}}:group_list')

    def test_func(self):
        return is_admin(self.request.user)


def register(request):
    if request.method == 'POST':
        form = CustomUserCreationForm(request.POST, request.FILES)
        if form.is_valid():
            form.save()
            return redirect('{{APP}}:login')
    else:
        form = CustomUserCreationForm()
    return render(request, '{{APP}}/register.html', {'form': form})
"#;

pub fn views_module(options: &AuthOptions) -> String {
    let mut module = VIEWS_HEADER.to_string();
    if options.two_factor {
        module.push_str(VIEWS_TWO_FACTOR);
    }
    module.push_str(VIEWS_BODY);
    fill(&module, &[("APP", options.app.as_str())])
}

const URLS_MODULE: &str = r#"from django.contrib.auth import views as auth_views
from django.urls import path, reverse_lazy

from . import views

app_name = '{{APP}}'

urlpatterns = [
    {{ROOT}}
    path('dashboard/', views.DashboardView.as_view(), name='dashboard'),
    path('profile/', views.ProfileUpdateView.as_view(), name='profile'),
    path('register/', views.register, name='register'),
{{OTP}}
    # User management
    path('users/', views.UserManagementListView.as_view(), name='user_list'),
    path('users/<int:pk>/edit/', views.UserUpdateView.as_view(), name='user_edit'),
    path('users/<int:pk>/delete/', views.UserDeleteView.as_view(), name='user_delete'),

    # Group management
    path('groups/', views.GroupListView.as_view(), name='group_list'),
    path('groups/add/', views.GroupCreateView.as_view(), name='group_add'),
    path('groups/<int:pk>/edit/', views.GroupUpdateView.as_view(), name='group_edit'),

    # Authentication
    {{LOGIN}}
    path('logout/', auth_views.LogoutView.as_view(next_page='{{APP}}:login'), name='logout'),
    path('password-change/', auth_views.PasswordChangeView.as_view(template_name='{{APP}}/password_change.html', success_url=reverse_lazy('{{APP}}:dashboard')), name='password_change'),
]
"#;

pub fn urls_module(options: &AuthOptions) -> String {
    let root = if options.landing_page {
        "path('', views.LandingView.as_view(), name='landing'),"
    } else {
        "path('', views.DashboardView.as_view(), name='index_dashboard'),"
    };
    let login = if options.two_factor {
        "path('login/', views.CustomLoginView.as_view(), name='login'),"
    } else {
        "path('login/', auth_views.LoginView.as_view(template_name='{{APP}}/login.html'), name='login'),"
    };
    let otp = if options.two_factor {
        "    path('verify-otp/', views.verify_otp, name='verify_otp'),\n"
    } else {
        ""
    };
    let module = fill(URLS_MODULE, &[("ROOT", root), ("LOGIN", login), ("OTP", otp)]);
    fill(&module, &[("APP", options.app.as_str())])
}

const BASE_HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{% block title %}{{PROJECT_NAME}}{% endblock %}</title>
    <link href="https://cdn.jsdelivr.net/npm/bootstrap@5.3.0/dist/css/bootstrap.min.css" rel="stylesheet">
    <link href="https://cdn.jsdelivr.net/npm/bootstrap-icons@1.11.0/font/bootstrap-icons.css" rel="stylesheet">
</head>
"#;

const BASE_AUTH_PAGE: &str = r#"<body class="bg-light d-flex align-items-center min-vh-100">
    <div class="container py-5">
        {% block content %}{% endblock %}
    </div>
    <script src="https://cdn.jsdelivr.net/npm/bootstrap@5.3.0/dist/js/bootstrap.bundle.min.js"></script>
</body>
</html>
"#;

const BASE_PAGE: &str = r#"<body class="bg-light">
    <nav class="navbar navbar-expand-lg navbar-light bg-white shadow-sm">
        <div class="container">
            <a class="navbar-brand fw-bold" href="/">{{PROJECT_NAME}}</a>
            <ul class="navbar-nav me-auto">
                <li class="nav-item"><a class="nav-link" href="{% url '{{APP}}:dashboard' %}">Dashboard</a></li>
                <li class="nav-item"><a class="nav-link" href="{% url '{{APP}}:user_list' %}">Users</a></li>
                {% if user.is_superuser or user.groups.all %}
                <li class="nav-item"><a class="nav-link" href="{% url '{{APP}}:group_list' %}">Groups</a></li>
                {% endif %}
            </ul>
            <div class="dropdown">
                <button class="btn btn-outline-secondary dropdown-toggle" data-bs-toggle="dropdown">{{ user.username }}</button>
                <ul class="dropdown-menu dropdown-menu-end">
                    <li><a class="dropdown-item" href="{% url '{{APP}}:profile' %}">Profile</a></li>
                    <li><a class="dropdown-item" href="{% url '{{APP}}:password_change' %}">Password</a></li>
                    <li>
                        <form action="{% url '{{APP}}:logout' %}" method="post">
                            {% csrf_token %}
                            <button type="submit" class="dropdown-item text-danger">Log out</button>
                        </form>
                    </li>
                </ul>
            </div>
        </div>
    </nav>
    <main class="container py-5">
        {% for message in messages %}
        <div class="alert alert-{{ message.tags }} alert-dismissible fade show">
            {{ message }}
            <button type="button" class="btn-close" data-bs-dismiss="alert"></button>
        </div>
        {% endfor %}
        {% block content %}{% endblock %}
    </main>
    <script src="https://cdn.jsdelivr.net/npm/bootstrap@5.3.0/dist/js/bootstrap.bundle.min.js"></script>
</body>
</html>
"#;

const LANDING: &str = r#"{% extends '{{APP}}/base_auth.html' %}
{% block content %}
<div class="text-center">
    <h1 class="display-4 fw-bold mb-3">{{PROJECT_NAME}}</h1>
    <p class="lead text-secondary mb-5">Welcome.</p>
    {% if user.is_authenticated %}
        <a href="{% url '{{APP}}:dashboard' %}" class="btn btn-primary btn-lg px-5">Dashboard</a>
    {% else %}
        <a href="{% url '{{APP}}:login' %}" class="btn btn-primary btn-lg px-5">Log in</a>
        <a href="{% url '{{APP}}:register' %}" class="btn btn-outline-primary btn-lg px-5">Sign up</a>
    {% endif %}
</div>
{% endblock %}
"#;

const DASHBOARD: &str = r#"{% extends '{{APP}}/base.html' %}
{% block title %}Dashboard{% endblock %}
{% block content %}
<div class="card bg-primary text-white p-5 mb-5 border-0">
    <h1 class="fw-bold">Welcome, {{ user.username }}!</h1>
    <p class="lead mb-0">Role:
        {% if is_admin %}Administrator{% elif is_manager %}Manager{% else %}Member{% endif %}
    </p>
</div>
<div class="row g-4">
    <div class="col-md-4">
        <div class="card p-4 h-100">
            <h5 class="fw-bold">My profile</h5>
            <p class="text-muted small">Update your personal information.</p>
            <a href="{% url '{{APP}}:profile' %}" class="btn btn-outline-primary btn-sm mt-auto">Manage</a>
        </div>
    </div>
    {% if is_admin or is_manager %}
    <div class="col-md-4">
        <div class="card p-4 h-100">
            <h5 class="fw-bold">Users</h5>
            <p class="text-muted small">Manage member accounts and access.</p>
            <a href="{% url '{{APP}}:user_list' %}" class="btn btn-outline-success btn-sm mt-auto">Administer</a>
        </div>
    </div>
    {% endif %}
    {% if is_admin %}
    <div class="col-md-4">
        <div class="card p-4 h-100">
            <h5 class="fw-bold">Groups &amp; roles</h5>
            <p class="text-muted small">Configure global permissions.</p>
            <a href="{% url '{{APP}}:group_list' %}" class="btn btn-outline-warning btn-sm mt-auto">Configure</a>
        </div>
    </div>
    {% endif %}
</div>
{% endblock %}
"#;

const LOGIN: &str = r#"{% extends '{{APP}}/base_auth.html' %}
{% block content %}
<div class="row justify-content-center">
    <div class="col-md-6 col-lg-5">
        <div class="card shadow p-5">
            <h2 class="fw-bold text-center mb-4">Log in</h2>
            {% if form.errors %}
            <div class="alert alert-danger">Invalid credentials.</div>
            {% endif %}
            <form method="post">
                {% csrf_token %}
                <div class="mb-3">
                    <label class="form-label">Username</label>
                    <input type="text" name="username" class="form-control" required>
                </div>
                <div class="mb-4">
                    <label class="form-label">Password</label>
                    <input type="password" name="password" class="form-control" required>
                </div>
                <button type="submit" class="btn btn-primary w-100">Log in</button>
            </form>
            <p class="text-center mt-4 mb-0">No account? <a href="{% url '{{APP}}:register' %}">Sign up</a></p>
        </div>
    </div>
</div>
{% endblock %}
"#;

const REGISTER: &str = r#"{% extends '{{APP}}/base_auth.html' %}
{% block content %}
<div class="row justify-content-center">
    <div class="col-md-8 col-lg-6">
        <div class="card shadow p-5">
            <h2 class="fw-bold text-center mb-4">Sign up</h2>
            <form method="post" enctype="multipart/form-data">
                {% csrf_token %}
                {{ form.as_p }}
                <button type="submit" class="btn btn-primary w-100 mt-3">Create my account</button>
            </form>
            <p class="text-center mt-4 mb-0">Already registered? <a href="{% url '{{APP}}:login' %}">Log in</a></p>
        </div>
    </div>
</div>
{% endblock %}
"#;

const PROFILE: &str = r#"{% extends '{{APP}}/base.html' %}
{% block content %}
<div class="col-lg-8 mx-auto card p-4">
    <h3 class="fw-bold text-center mb-4">My profile</h3>
    {% if user.photo_profil %}
    <img src="{{ user.photo_profil.url }}" class="rounded-circle mx-auto mb-3" width="100" height="100">
    {% endif %}
    <form method="post" enctype="multipart/form-data">
        {% csrf_token %}
        {{ form.as_p }}
        <a href="{% url '{{APP}}:password_change' %}" class="btn btn-outline-warning">Password</a>
        <button type="submit" class="btn btn-primary">Save</button>
    </form>
</div>
{% endblock %}
"#;

const PASSWORD_CHANGE: &str = r#"{% extends '{{APP}}/base.html' %}
{% block content %}
<div class="col-lg-6 mx-auto card p-4">
    <h3 class="fw-bold mb-4">Change password</h3>
    <form method="post">
        {% csrf_token %}
        {{ form.as_p }}
        <button type="submit" class="btn btn-primary">Update</button>
    </form>
</div>
{% endblock %}
"#;

const USER_LIST: &str = r#"{% extends '{{APP}}/base.html' %}
{% block content %}
<h2 class="fw-bold mb-4">Users</h2>
<table class="table table-hover align-middle">
    <thead>
        <tr><th>Username</th><th>Email</th><th>Groups</th><th>Active</th><th class="text-end">Actions</th></tr>
    </thead>
    <tbody>
        {% for member in users %}
        <tr>
            <td>{{ member.username }}</td>
            <td>{{ member.email }}</td>
            <td>{% for group in member.groups.all %}<span class="badge bg-secondary">{{ group.name }}</span> {% endfor %}</td>
            <td>{% if member.is_active %}Yes{% else %}No{% endif %}</td>
            <td class="text-end">
                <a href="{% url '{{APP}}:user_edit' member.pk %}" class="btn btn-sm btn-outline-primary">Edit</a>
                <a href="{% url '{{APP}}:user_delete' member.pk %}" class="btn btn-sm btn-outline-danger">Delete</a>
            </td>
        </tr>
        {% empty %}
        <tr><td colspan="5">No users yet.</td></tr>
        {% endfor %}
    </tbody>
</table>
{% endblock %}
"#;

const USER_FORM: &str = r#"{% extends '{{APP}}/base.html' %}
{% block content %}
<div class="col-lg-8 mx-auto card p-4">
    <h3 class="fw-bold mb-4">Edit {{ object.username }}</h3>
    <form method="post">
        {% csrf_token %}
        {{ form.as_p }}
        <a href="{% url '{{APP}}:user_list' %}" class="btn btn-light">Cancel</a>
        <button type="submit" class="btn btn-primary">Save</button>
    </form>
</div>
{% endblock %}
"#;

const USER_CONFIRM_DELETE: &str = r#"{% extends '{{APP}}/base.html' %}
{% block content %}
<div class="col-md-6 mx-auto card p-5 text-center">
    <h3>Confirm deletion</h3>
    <p class="text-muted">Delete user <strong>{{ object.username }}</strong>? This cannot be undone.</p>
    <form method="post">
        {% csrf_token %}
        <a href="{% url '{{APP}}:user_list' %}" class="btn btn-light">Cancel</a>
        <button type="submit" class="btn btn-danger">Delete permanently</button>
    </form>
</div>
{% endblock %}
"#;

const GROUP_LIST: &str = r#"{% extends '{{APP}}/base.html' %}
{% block content %}
<div class="d-flex justify-content-between align-items-center mb-4">
    <h2 class="fw-bold">Groups &amp; permissions</h2>
    <a href="{% url '{{APP}}:group_add' %}" class="btn btn-primary">New group</a>
</div>
<table class="table table-hover align-middle">
    <thead>
        <tr><th>Group</th><th>Permissions</th><th class="text-end">Actions</th></tr>
    </thead>
    <tbody>
        {% for group in groups %}
        <tr>
            <td class="fw-bold">{{ group.name }}</td>
            <td><span class="badge bg-secondary">{{ group.permissions.count }} permissions</span></td>
            <td class="text-end"><a href="{% url '{{APP}}:group_edit' group.pk %}" class="btn btn-sm btn-light border">Edit</a></td>
        </tr>
        {% endfor %}
    </tbody>
</table>
{% endblock %}
"#;

const GROUP_FORM: &str = r#"{% extends '{{APP}}/base.html' %}
{% block content %}
<div class="col-lg-8 mx-auto card p-5">
    <h3 class="fw-bold mb-4">{% if object %}Edit group{% else %}Create group{% endif %}</h3>
    <form method="post">
        {% csrf_token %}
        <div class="mb-4">
            <label class="form-label fw-bold">Name</label>
            <input type="text" name="name" class="form-control" value="{{ form.name.value|default:'' }}" required>
        </div>
        <div class="mb-4 border rounded p-3 overflow-auto" style="max-height: 400px;">
            {{ form.permissions }}
        </div>
        <a href="{% url '{{APP}}:group_list' %}" class="btn btn-light">Cancel</a>
        <button type="submit" class="btn btn-primary">Save</button>
    </form>
</div>
{% endblock %}
"#;

const VERIFY_OTP: &str = r#"{% extends '{{APP}}/base_auth.html' %}
{% block content %}
<div class="card p-5 text-center mx-auto" style="max-width: 450px;">
    <h3 class="fw-bold mb-3">Security check</h3>
    <p class="text-muted mb-4">Enter the code sent to your email.</p>
    <form method="post">
        {% csrf_token %}
        <input type="text" name="otp" class="form-control form-control-lg text-center mb-4" placeholder="000000" maxlength="6" autofocus required>
        <button type="submit" class="btn btn-primary w-100">Verify</button>
    </form>
    <a href="{% url '{{APP}}:login' %}" class="d-block mt-4 small">Back</a>
</div>
{% endblock %}
"#;

/// All pages as `(file name, content)`; the landing and OTP pages depend on the options.
pub fn pages(options: &AuthOptions, project_name: &str) -> Vec<(String, String)> {
    let mut pages = vec![
        ("base_auth.html", format!("{}{}", BASE_HEAD, BASE_AUTH_PAGE)),
        ("base.html", format!("{}{}", BASE_HEAD, BASE_PAGE)),
        ("dashboard.html", DASHBOARD.to_string()),
        ("login.html", LOGIN.to_string()),
        ("register.html", REGISTER.to_string()),
        ("profile.html", PROFILE.to_string()),
        ("password_change.html", PASSWORD_CHANGE.to_string()),
        ("user_list.html", USER_LIST.to_string()),
        ("user_form.html", USER_FORM.to_string()),
        ("user_confirm_delete.html", USER_CONFIRM_DELETE.to_string()),
        ("group_list.html", GROUP_LIST.to_string()),
        ("group_form.html", GROUP_FORM.to_string()),
    ];
    if options.landing_page {
        pages.push(("landing.html", LANDING.to_string()));
    }
    if options.two_factor {
        pages.push(("verify_otp.html", VERIFY_OTP.to_string()));
    }

    pages
        .into_iter()
        .map(|(name, html)| {
            let html = replace_placeholders(&html, project_name);
            (name.to_string(), fill(&html, &[("APP", options.app.as_str())]))
        })
        .collect()
}

/// Credentials of the test accounts created by the bootstrap script
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestAccounts {
    pub superuser_password: String,
    pub admin_password: String,
}

const BOOTSTRAP_GROUPS: &str = r#"from django.contrib.auth import get_user_model
from django.contrib.auth.models import Group, Permission

User = get_user_model()

groups = {
    'Admin_Site': {'all': True},
    'Manager': {'permissions': ['view_customuser', 'change_customuser', 'add_customuser']},
    'Member': {'permissions': ['view_customuser']},
}

for group_name, config in groups.items():
    group, created = Group.objects.get_or_create(name=group_name)
    if created:
        print(f"Created group: {group_name}")
    if config.get('all'):
        group.permissions.set(Permission.objects.all())
    else:
        for codename in config.get('permissions', []):
            perm = Permission.objects.filter(codename=codename).first()
            if perm:
                group.permissions.add(perm)
"#;

const BOOTSTRAP_USERS: &str = r#"
if not User.objects.filter(username='superuser').exists():
    User.objects.create_superuser('superuser', 'superuser@example.com', '{{SUPERUSER_PASSWORD}}')
    print("Created superuser: superuser")

if not User.objects.filter(username='admin').exists():
    admin = User.objects.create_user('admin', 'admin@example.com', '{{ADMIN_PASSWORD}}')
    admin.groups.add(Group.objects.get(name='Admin_Site'))
    print("Created admin user: admin (group Admin_Site)")
"#;

/// Script run through `manage.py shell -c` to create groups and, optionally, test users
pub fn bootstrap_script(accounts: Option<&TestAccounts>) -> String {
    let mut script = BOOTSTRAP_GROUPS.to_string();
    if let Some(accounts) = accounts {
        script.push_str(&fill(
            BOOTSTRAP_USERS,
            &[
                ("SUPERUSER_PASSWORD", accounts.superuser_password.as_str()),
                ("ADMIN_PASSWORD", accounts.admin_password.as_str()),
            ],
        ));
    }
    script.push_str("\nprint(\"Groups and users initialization complete.\")\n");
    script
}

const GUIDE: &str = r#"# Authentication guide for {{PROJECT_NAME}}

Generated on {{DATE}} for the `{{APP}}` app.

## What was generated

- `{{APP}}/models.py`: `CustomUser` extends `AbstractUser` with a profile photo and one-time code fields.
- `{{APP}}/signals.py`: new users join the `{{GROUP}}` group.
- `{{APP}}/forms.py`, `{{APP}}/views.py`, `{{APP}}/urls.py`: registration, dashboard, profile, user and group management.
- `{{APP}}/templates/{{APP}}/`: Bootstrap pages for every view.
- settings.py: `AUTH_USER_MODEL`, login and logout redirects, console email backend and a commented SMTP block.

## Groups

| Group | Permissions |
|---|---|
| Admin_Site | every permission |
| Manager | view, add and change users |
| Member | view users |

Edit them at `/{{MOUNT}}groups/` once logged in as an administrator.

## Urls

- Login: `/{{MOUNT}}login/`
- Dashboard: `/{{MOUNT}}dashboard/`
- Admin site: `/{{ADMIN}}/`

## Next steps

1. Install Pillow for profile photos: `pip install Pillow`.
2. Configure SMTP in settings.py before enabling emails in production.
3. Restrict your own views with `LoginRequiredMixin` and group checks such as `user.groups.filter(name='Manager').exists()`.
{{TWO_FACTOR}}"#;

pub fn guide(options: &AuthOptions, project_name: &str) -> String {
    let mount = options.mount_prefix();
    let two_factor = if options.two_factor {
        "4. Two-factor login emails a 6 digit code; install `django-two-factor-auth` for a complete implementation.\n"
    } else {
        ""
    };
    let guide = replace_placeholders(GUIDE, project_name);
    fill(
        &guide,
        &[
            ("APP", options.app.as_str()),
            ("GROUP", options.default_group.group_name()),
            ("MOUNT", mount.as_str()),
            ("ADMIN", options.admin_url.as_str()),
            ("TWO_FACTOR", two_factor),
        ],
    )
}

/// Menu lines shown before asking for the default group
pub fn group_menu() -> Vec<String> {
    DefaultGroup::ALL
        .iter()
        .enumerate()
        .map(|(i, group)| format!("{}. {}", i + 1, group))
        .collect()
}
