//! Demo data seeded at process start: three crews, five clients and a
//! spread of appointments across today, tomorrow and the day after.

use anyhow::Result;
use chrono::{Duration, Local};
use log::info;

use shared::{
    AddCrewMemberRequest, AppointmentStatus, AppointmentTask, CreateClientRequest,
    CreateCrewRequest, CrewRole,
};

use crate::domain::appointment_service::default_tasks;
use crate::domain::commands::appointments::CreateAppointmentCommand;
use crate::rest::AppState;

struct MemberSeed {
    name: &'static str,
    role: CrewRole,
    phone: &'static str,
}

struct CrewSeed {
    name: &'static str,
    color: &'static str,
    members: [MemberSeed; 2],
}

struct ClientSeed {
    name: &'static str,
    phone: &'static str,
    email: &'static str,
    address: &'static str,
    city: &'static str,
    state: &'static str,
    zip: &'static str,
    sqft: u32,
    bedrooms: u32,
    bathrooms: u32,
    care_instructions: &'static str,
}

/// client index, crew index, day offset, start, duration, status.
struct AppointmentSeed {
    client: usize,
    crew: usize,
    day_offset: i64,
    start_hour: u32,
    start_minute: u32,
    duration_minutes: u32,
    status: AppointmentStatus,
}

const CREWS: [CrewSeed; 3] = [
    CrewSeed {
        name: "Alpha Team",
        color: "hsl(224, 58%, 33%)",
        members: [
            MemberSeed {
                name: "Maria Garcia",
                role: CrewRole::Lider,
                phone: "(816) 555-1001",
            },
            MemberSeed {
                name: "James Wilson",
                role: CrewRole::EmpleadoGeneral,
                phone: "(816) 555-1002",
            },
        ],
    },
    CrewSeed {
        name: "Beta Team",
        color: "hsl(160, 84%, 39%)",
        members: [
            MemberSeed {
                name: "Sarah Johnson",
                role: CrewRole::Lider,
                phone: "(913) 555-2001",
            },
            MemberSeed {
                name: "Mike Brown",
                role: CrewRole::EmpleadoGeneral,
                phone: "(913) 555-2002",
            },
        ],
    },
    CrewSeed {
        name: "Gamma Team",
        color: "hsl(197, 60%, 45%)",
        members: [
            MemberSeed {
                name: "Lisa Chen",
                role: CrewRole::Lider,
                phone: "(816) 555-3001",
            },
            MemberSeed {
                name: "Tom Davis",
                role: CrewRole::EmpleadoGeneral,
                phone: "(816) 555-3002",
            },
        ],
    },
];

const CLIENTS: [ClientSeed; 5] = [
    ClientSeed {
        name: "Thompson Residence",
        phone: "(816) 555-0142",
        email: "thompson@email.com",
        address: "1234 Oak Street",
        city: "Kansas City",
        state: "MO",
        zip: "64108",
        sqft: 2400,
        bedrooms: 4,
        bathrooms: 3,
        care_instructions: "Use eco-friendly products only. Dog in backyard.",
    },
    ClientSeed {
        name: "Miller Home",
        phone: "(913) 555-0278",
        email: "miller@email.com",
        address: "5678 Elm Avenue",
        city: "Overland Park",
        state: "KS",
        zip: "66204",
        sqft: 1800,
        bedrooms: 3,
        bathrooms: 2,
        care_instructions: "Alarm code: 4521. Key under mat.",
    },
    ClientSeed {
        name: "Davis Office",
        phone: "(816) 555-0391",
        email: "davis@email.com",
        address: "910 Main Street, Suite 200",
        city: "Kansas City",
        state: "MO",
        zip: "64105",
        sqft: 3200,
        bedrooms: 0,
        bathrooms: 2,
        care_instructions: "Commercial space. Clean after 6 PM only.",
    },
    ClientSeed {
        name: "Park Residence",
        phone: "(913) 555-0456",
        email: "park@email.com",
        address: "2210 Maple Drive",
        city: "Lenexa",
        state: "KS",
        zip: "66215",
        sqft: 2800,
        bedrooms: 5,
        bathrooms: 3,
        care_instructions: "Hardwood floors only - no wet mopping in living room.",
    },
    ClientSeed {
        name: "Rivera Condo",
        phone: "(816) 555-0633",
        email: "rivera@email.com",
        address: "401 Grand Blvd, Unit 12B",
        city: "Kansas City",
        state: "MO",
        zip: "64106",
        sqft: 1200,
        bedrooms: 2,
        bathrooms: 1,
        care_instructions: "Condo rules: no vacuuming before 9 AM. Use service elevator.",
    },
];

const APPOINTMENTS: [AppointmentSeed; 7] = [
    AppointmentSeed { client: 0, crew: 0, day_offset: 0, start_hour: 8, start_minute: 0, duration_minutes: 120, status: AppointmentStatus::Scheduled },
    AppointmentSeed { client: 1, crew: 0, day_offset: 0, start_hour: 11, start_minute: 0, duration_minutes: 90, status: AppointmentStatus::Scheduled },
    AppointmentSeed { client: 2, crew: 1, day_offset: 0, start_hour: 9, start_minute: 0, duration_minutes: 150, status: AppointmentStatus::InProgress },
    AppointmentSeed { client: 3, crew: 1, day_offset: 1, start_hour: 8, start_minute: 30, duration_minutes: 120, status: AppointmentStatus::Scheduled },
    AppointmentSeed { client: 4, crew: 2, day_offset: 0, start_hour: 10, start_minute: 0, duration_minutes: 60, status: AppointmentStatus::Completed },
    AppointmentSeed { client: 0, crew: 2, day_offset: 1, start_hour: 13, start_minute: 0, duration_minutes: 120, status: AppointmentStatus::Scheduled },
    AppointmentSeed { client: 2, crew: 0, day_offset: 2, start_hour: 9, start_minute: 0, duration_minutes: 180, status: AppointmentStatus::Scheduled },
];

fn completed_tasks() -> Vec<AppointmentTask> {
    default_tasks()
        .into_iter()
        .map(|t| AppointmentTask { done: true, ..t })
        .collect()
}

/// Populate an empty store with the demo dataset.
pub fn seed_demo_data(state: &AppState) -> Result<()> {
    let today = Local::now().date_naive();

    let mut crew_ids = Vec::with_capacity(CREWS.len());
    for seed in &CREWS {
        let crew = state.crews.create(CreateCrewRequest {
            name: seed.name.to_string(),
            color: seed.color.to_string(),
        })?;
        for member in &seed.members {
            state.crews.add_member(
                &crew.id,
                AddCrewMemberRequest {
                    name: member.name.to_string(),
                    role: member.role,
                    phone: member.phone.to_string(),
                    avatar: None,
                    documents: None,
                },
            )?;
        }
        crew_ids.push(crew.id);
    }

    let mut client_ids = Vec::with_capacity(CLIENTS.len());
    for seed in &CLIENTS {
        let client = state.clients.create(CreateClientRequest {
            name: seed.name.to_string(),
            phone: seed.phone.to_string(),
            email: seed.email.to_string(),
            address: seed.address.to_string(),
            city: seed.city.to_string(),
            state: seed.state.to_string(),
            zip: seed.zip.to_string(),
            sqft: seed.sqft,
            bedrooms: seed.bedrooms,
            bathrooms: seed.bathrooms,
            care_instructions: seed.care_instructions.to_string(),
            images: None,
        })?;
        client_ids.push(client.id);
    }

    for seed in &APPOINTMENTS {
        let date = (today + Duration::days(seed.day_offset))
            .format("%Y-%m-%d")
            .to_string();
        let tasks = match seed.status {
            AppointmentStatus::Completed => Some(completed_tasks()),
            _ => None,
        };
        let appointment = state.appointments.create(CreateAppointmentCommand {
            client_id: client_ids[seed.client].clone(),
            crew_id: crew_ids[seed.crew].clone(),
            date,
            start_hour: seed.start_hour,
            start_minute: seed.start_minute,
            duration_minutes: seed.duration_minutes,
            tasks,
            notes: None,
        })?;
        if seed.status != AppointmentStatus::Scheduled {
            state
                .appointments
                .set_status(&appointment.id, seed.status)?;
        }
    }

    info!(
        "Seeded demo data: {} crews, {} clients, {} appointments",
        CREWS.len(),
        CLIENTS.len(),
        APPOINTMENTS.len()
    );
    Ok(())
}
