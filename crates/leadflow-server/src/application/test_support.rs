//! In-memory port implementations for service tests.
//!
//! Each double mirrors the conditional-update guards of the Postgres
//! adapters so services exercise the same at-most-one-winner semantics
//! without a live database.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use uuid::Uuid;

use leadflow::{
    Activity, ActivityRepository, Agent, AgentRepository, CallEvent, CallEventRepository,
    CallInsert, CursorRepository, EngineError, InAppNotification, Language, Lead, LeadRepository,
    NotificationDispatcher, Reminder, ReminderRepository, RoundRobinCursor,
};

fn digits(s: &str) -> String {
    s.chars().filter(|c| c.is_ascii_digit()).collect()
}

#[derive(Default)]
pub struct InMemoryLeads {
    leads: Mutex<HashMap<Uuid, Lead>>,
}

impl InMemoryLeads {
    pub fn put(&self, lead: Lead) {
        self.leads.lock().unwrap().insert(lead.id, lead);
    }

    pub fn get(&self, id: Uuid) -> Option<Lead> {
        self.leads.lock().unwrap().get(&id).cloned()
    }
}

#[async_trait]
impl LeadRepository for InMemoryLeads {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Lead>, EngineError> {
        Ok(self.get(id))
    }

    async fn insert(&self, lead: &Lead) -> Result<Lead, EngineError> {
        self.put(lead.clone());
        Ok(lead.clone())
    }

    async fn find_by_phone_suffix(&self, suffix_key: &str) -> Result<Vec<Lead>, EngineError> {
        let mut matches: Vec<Lead> = self
            .leads
            .lock()
            .unwrap()
            .values()
            .filter(|l| !l.archived && digits(&l.phone_number).contains(suffix_key))
            .cloned()
            .collect();
        matches.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matches)
    }

    async fn try_assign(
        &self,
        lead_id: Uuid,
        agent_id: Uuid,
        assigned_at: DateTime<Utc>,
        claim_deadline: DateTime<Utc>,
    ) -> Result<Option<Lead>, EngineError> {
        let mut leads = self.leads.lock().unwrap();
        let Some(lead) = leads.get_mut(&lead_id) else {
            return Ok(None);
        };
        if lead.assigned_agent_id.is_some() || lead.archived {
            return Ok(None);
        }
        lead.assigned_agent_id = Some(agent_id);
        lead.assigned_at = Some(assigned_at);
        lead.claim_timer_expires_at = Some(claim_deadline);
        lead.updated_at = assigned_at;
        Ok(Some(lead.clone()))
    }

    async fn try_claim(
        &self,
        lead_id: Uuid,
        agent_id: Uuid,
        claimed_at: DateTime<Utc>,
        contact_deadline: DateTime<Utc>,
    ) -> Result<Option<Lead>, EngineError> {
        let mut leads = self.leads.lock().unwrap();
        let Some(lead) = leads.get_mut(&lead_id) else {
            return Ok(None);
        };
        if lead.assigned_agent_id != Some(agent_id)
            || lead.claimed
            || lead.first_contact_at.is_some()
            || lead.archived
        {
            return Ok(None);
        }
        lead.claimed = true;
        lead.claimed_at = Some(claimed_at);
        lead.claim_timer_expires_at = None;
        lead.contact_timer_expires_at = Some(contact_deadline);
        lead.updated_at = claimed_at;
        Ok(Some(lead.clone()))
    }

    async fn try_record_contact(
        &self,
        lead_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<Option<Lead>, EngineError> {
        let mut leads = self.leads.lock().unwrap();
        let Some(lead) = leads.get_mut(&lead_id) else {
            return Ok(None);
        };
        if !lead.claimed || lead.first_contact_at.is_some() {
            return Ok(None);
        }
        lead.first_contact_at = Some(at);
        lead.last_contact_at = Some(at);
        lead.contact_timer_expires_at = None;
        lead.contact_sla_breached = false;
        lead.updated_at = at;
        Ok(Some(lead.clone()))
    }

    async fn try_mark_claim_breached(
        &self,
        lead_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<bool, EngineError> {
        let mut leads = self.leads.lock().unwrap();
        let Some(lead) = leads.get_mut(&lead_id) else {
            return Ok(false);
        };
        let expired = lead
            .claim_timer_expires_at
            .map(|deadline| deadline < now)
            .unwrap_or(false);
        if lead.claimed || lead.claim_sla_breached || lead.archived || !expired {
            return Ok(false);
        }
        lead.claim_sla_breached = true;
        lead.updated_at = now;
        Ok(true)
    }

    async fn find_claim_breaches(&self, now: DateTime<Utc>) -> Result<Vec<Lead>, EngineError> {
        let mut breaches: Vec<Lead> = self
            .leads
            .lock()
            .unwrap()
            .values()
            .filter(|l| {
                !l.claimed
                    && !l.claim_sla_breached
                    && !l.archived
                    && l.claim_timer_expires_at
                        .map(|deadline| deadline < now)
                        .unwrap_or(false)
            })
            .cloned()
            .collect();
        breaches.sort_by_key(|l| l.claim_timer_expires_at);
        Ok(breaches)
    }
}

#[derive(Default)]
pub struct InMemoryAgents {
    agents: Mutex<BTreeMap<Uuid, Agent>>,
}

impl InMemoryAgents {
    pub fn add(&self, languages: Vec<Language>, max_active_leads: i32) -> Uuid {
        let id = Uuid::new_v4();
        let agent = Agent {
            id,
            first_name: "Agent".to_string(),
            last_name: format!("{}", &id.to_string()[..8]),
            email: format!("agent-{}@example.com", &id.to_string()[..8]),
            phone: None,
            languages,
            max_active_leads,
            current_lead_count: 0,
            is_active: true,
            accepts_new_leads: true,
            email_notifications: true,
            slack_notifications: false,
            slack_channel_ids: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.agents.lock().unwrap().insert(id, agent);
        id
    }

    pub fn lead_count(&self, id: Uuid) -> i32 {
        self.agents
            .lock()
            .unwrap()
            .get(&id)
            .map(|a| a.current_lead_count)
            .unwrap_or(0)
    }
}

#[async_trait]
impl AgentRepository for InMemoryAgents {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Agent>, EngineError> {
        Ok(self.agents.lock().unwrap().get(&id).cloned())
    }

    async fn find_eligible(&self, language: Language) -> Result<Vec<Agent>, EngineError> {
        Ok(self
            .agents
            .lock()
            .unwrap()
            .values()
            .filter(|a| a.is_eligible(language))
            .cloned()
            .collect())
    }

    async fn try_reserve_slot(&self, agent_id: Uuid) -> Result<bool, EngineError> {
        let mut agents = self.agents.lock().unwrap();
        let Some(agent) = agents.get_mut(&agent_id) else {
            return Ok(false);
        };
        if !agent.is_active || !agent.accepts_new_leads || !agent.has_capacity() {
            return Ok(false);
        }
        agent.current_lead_count += 1;
        Ok(true)
    }

    async fn release_slot(&self, agent_id: Uuid) -> Result<(), EngineError> {
        if let Some(agent) = self.agents.lock().unwrap().get_mut(&agent_id) {
            agent.current_lead_count = (agent.current_lead_count - 1).max(0);
        }
        Ok(())
    }

    async fn find_by_email_or_phone(
        &self,
        email: Option<&str>,
        phone: Option<&str>,
    ) -> Result<Option<Agent>, EngineError> {
        Ok(self
            .agents
            .lock()
            .unwrap()
            .values()
            .find(|a| {
                email.is_some_and(|e| a.email == e)
                    || phone.is_some_and(|p| a.phone.as_deref() == Some(p))
            })
            .cloned())
    }
}

#[derive(Default)]
pub struct InMemoryCursors {
    cursors: Mutex<HashMap<Language, RoundRobinCursor>>,
}

impl InMemoryCursors {
    pub fn add(&self, language: Language, position: i32, fallback_admin_id: Option<Uuid>) {
        let cursor = RoundRobinCursor {
            id: Uuid::new_v4(),
            language,
            rotation_cursor: position,
            fallback_admin_id,
            claim_window_minutes: None,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.cursors.lock().unwrap().insert(language, cursor);
    }
}

#[async_trait]
impl CursorRepository for InMemoryCursors {
    async fn find_by_language(
        &self,
        language: Language,
    ) -> Result<Option<RoundRobinCursor>, EngineError> {
        Ok(self
            .cursors
            .lock()
            .unwrap()
            .get(&language)
            .filter(|c| c.is_active)
            .cloned())
    }

    async fn try_advance(
        &self,
        language: Language,
        expected: i32,
        next: i32,
    ) -> Result<bool, EngineError> {
        let mut cursors = self.cursors.lock().unwrap();
        let Some(cursor) = cursors.get_mut(&language) else {
            return Ok(false);
        };
        if cursor.rotation_cursor != expected {
            return Ok(false);
        }
        cursor.rotation_cursor = next;
        Ok(true)
    }
}

#[derive(Default)]
pub struct InMemoryCalls {
    calls: Mutex<HashMap<String, CallEvent>>,
}

impl InMemoryCalls {
    pub fn count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl CallEventRepository for InMemoryCalls {
    async fn record(&self, call: &CallEvent) -> Result<CallInsert, EngineError> {
        let mut calls = self.calls.lock().unwrap();
        if calls.contains_key(&call.provider_call_id) {
            return Ok(CallInsert::Duplicate);
        }
        calls.insert(call.provider_call_id.clone(), call.clone());
        Ok(CallInsert::Recorded(call.clone()))
    }
}

#[derive(Default)]
pub struct InMemoryReminders {
    reminders: Mutex<HashMap<Uuid, Reminder>>,
}

#[async_trait]
impl ReminderRepository for InMemoryReminders {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Reminder>, EngineError> {
        Ok(self.reminders.lock().unwrap().get(&id).cloned())
    }

    async fn insert(&self, reminder: &Reminder) -> Result<Reminder, EngineError> {
        self.reminders
            .lock()
            .unwrap()
            .insert(reminder.id, reminder.clone());
        Ok(reminder.clone())
    }

    async fn save(&self, reminder: &Reminder) -> Result<Reminder, EngineError> {
        self.reminders
            .lock()
            .unwrap()
            .insert(reminder.id, reminder.clone());
        Ok(reminder.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, EngineError> {
        Ok(self.reminders.lock().unwrap().remove(&id).is_some())
    }

    async fn find_due(&self, now: DateTime<Utc>) -> Result<Vec<Reminder>, EngineError> {
        let mut due: Vec<Reminder> = self
            .reminders
            .lock()
            .unwrap()
            .values()
            .filter(|r| r.is_due(now))
            .cloned()
            .collect();
        due.sort_by(|a, b| {
            a.reminder_datetime
                .cmp(&b.reminder_datetime)
                .then(a.id.cmp(&b.id))
        });
        Ok(due)
    }
}

#[derive(Default)]
pub struct InMemoryActivities {
    activities: Mutex<Vec<Activity>>,
}

impl InMemoryActivities {
    pub fn count(&self) -> usize {
        self.activities.lock().unwrap().len()
    }
}

#[async_trait]
impl ActivityRepository for InMemoryActivities {
    async fn insert(&self, activity: &Activity) -> Result<Activity, EngineError> {
        self.activities.lock().unwrap().push(activity.clone());
        Ok(activity.clone())
    }
}

/// Records every dispatched notification; optionally fails a channel to
/// exercise the best-effort contract.
#[derive(Default)]
pub struct RecordingNotifier {
    pub emails: Mutex<Vec<(String, String)>>,
    pub chats: Mutex<Vec<String>>,
    pub in_app: Mutex<Vec<InAppNotification>>,
    pub fail_email: AtomicBool,
}

impl RecordingNotifier {
    pub fn email_count(&self) -> usize {
        self.emails.lock().unwrap().len()
    }

    pub fn in_app_count(&self) -> usize {
        self.in_app.lock().unwrap().len()
    }
}

#[async_trait]
impl NotificationDispatcher for RecordingNotifier {
    async fn send_email(
        &self,
        to: &str,
        subject: &str,
        _html_body: &str,
    ) -> Result<(), EngineError> {
        if self.fail_email.load(Ordering::SeqCst) {
            return Err(EngineError::NotificationDelivery(
                "email channel down".to_string(),
            ));
        }
        self.emails
            .lock()
            .unwrap()
            .push((to.to_string(), subject.to_string()));
        Ok(())
    }

    async fn send_chat(&self, _channel_ids: &[String], message: &str) -> Result<(), EngineError> {
        self.chats.lock().unwrap().push(message.to_string());
        Ok(())
    }

    async fn send_in_app(&self, notification: &InAppNotification) -> Result<(), EngineError> {
        self.in_app.lock().unwrap().push(notification.clone());
        Ok(())
    }
}
